//! Shared numeric primitives for the timeline model.

use std::cmp::Ordering;

/// Smallest duration a section may have, in seconds.
pub const MIN_SECTION_SEC: f64 = 0.1;

/// Forward nudge applied to curve points that collide in time.
pub const TIE_EPSILON: f64 = 1e-4;

/// Slack used when checking durations against [`MIN_SECTION_SEC`], so that
/// values re-derived by subtraction are not floored a second time.
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Largest time magnitude a section bound or curve point may take, in
/// seconds. Far below the point where [`MIN_SECTION_SEC`] or
/// [`TIE_EPSILON`] would be lost to rounding.
pub const MAX_TIME_SEC: f64 = 1e9;

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics; a NaN input collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Clamp a transition bias into `[-1, 1]`.
pub fn clamp_param(param: f64) -> f64 {
    clamp(param, -1.0, 1.0)
}

/// Ascending comparison of two time values; incomparable values are equal.
pub fn compare_time(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// The time a colliding point moves to when it sits at or before `previous`.
///
/// Normally `previous + TIE_EPSILON`; at magnitudes where that addition is
/// absorbed by rounding, the next representable value is used instead.
pub fn nudge_after(previous: f64) -> f64 {
    let candidate = previous + TIE_EPSILON;
    if candidate > previous {
        candidate
    } else {
        next_up(previous)
    }
}

fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Whether `sec` is finite and within `[-MAX_TIME_SEC, MAX_TIME_SEC]`.
pub fn is_time_in_range(sec: f64) -> bool {
    sec.is_finite() && sec.abs() <= MAX_TIME_SEC
}

/// Whether two time values agree within [`FLOAT_TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= FLOAT_TOLERANCE
}
