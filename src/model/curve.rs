//! Energy Curve Point Operations
//!
//! Points are kept strictly increasing in time. Collisions are resolved by
//! nudging the later point forward by
//! [`TIE_EPSILON`](crate::model::values::TIE_EPSILON), after a sort that
//! breaks ties by id so the outcome does not depend on input order. Edits
//! that would place a point beyond
//! [`MAX_TIME_SEC`](crate::model::values::MAX_TIME_SEC) are skipped.

use crate::model::ids::{fresh_id, IdGenerator};
use crate::model::outcome::{EditOutcome, SkipReason};
use crate::model::types::{CurvePoint, Transition, TransitionType};
use crate::model::values::{clamp, clamp_param, compare_time, nudge_after};

/// Prefix of generated curve point ids.
pub const POINT_ID_PREFIX: &str = "pt";

/// Result of [`add_curve_point`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddedPoint {
    pub points: Vec<CurvePoint>,
    pub id: String,
}

/// Sort key: time, then id.
pub(crate) fn compare_points(a: &CurvePoint, b: &CurvePoint) -> std::cmp::Ordering {
    compare_time(a.sec, b.sec).then_with(|| a.id.cmp(&b.id))
}

/// Sort by `(sec, id)` and push every point that is not after its
/// predecessor to just past it.
///
/// The nudge can carry the last point past `MAX_TIME_SEC`; the edits check
/// for that and skip.
pub fn sort_and_resolve(mut points: Vec<CurvePoint>) -> Vec<CurvePoint> {
    points.sort_by(compare_points);

    let mut last_sec = f64::NEG_INFINITY;
    for point in &mut points {
        if point.sec <= last_sec {
            point.sec = nudge_after(last_sec);
        }
        last_sec = point.sec;
    }
    points
}

/// Whether every point is strictly after the one before it.
pub fn is_strictly_increasing(points: &[CurvePoint]) -> bool {
    points.windows(2).all(|pair| pair[0].sec < pair[1].sec)
}

/// Add a point at `(sec, y)` with a linear transition; `y` is clamped into
/// `[y_min, y_max]` and the new id is unique within `points`.
pub fn add_curve_point(
    points: &[CurvePoint],
    sec: f64,
    y: f64,
    y_min: f64,
    y_max: f64,
    ids: &mut impl IdGenerator,
) -> EditOutcome<AddedPoint> {
    if let Some(reason) = SkipReason::check_time(sec) {
        return EditOutcome::skip(reason);
    }

    let id = fresh_id(ids, POINT_ID_PREFIX, |candidate| {
        points.iter().any(|p| p.id == candidate)
    });
    let mut next = points.to_vec();
    next.push(CurvePoint::new(id.clone(), sec, clamp(y, y_min, y_max)));

    resolve_within_limit(next).map(|points| AddedPoint { points, id })
}

/// Move the point `id` to `(sec, y)`, clamping `y` into `[y_min, y_max]`.
///
/// Other points keep their values but may change position in the list.
pub fn move_curve_point(
    points: &[CurvePoint],
    id: &str,
    sec: f64,
    y: f64,
    y_min: f64,
    y_max: f64,
) -> EditOutcome<Vec<CurvePoint>> {
    if let Some(reason) = SkipReason::check_time(sec) {
        return EditOutcome::skip(reason);
    }
    if !points.iter().any(|p| p.id == id) {
        return EditOutcome::skip(SkipReason::UnknownPoint { id: id.to_string() });
    }

    let clamped_y = clamp(y, y_min, y_max);
    let next = points
        .iter()
        .map(|p| {
            if p.id == id {
                CurvePoint {
                    sec,
                    y: clamped_y,
                    ..p.clone()
                }
            } else {
                p.clone()
            }
        })
        .collect();

    resolve_within_limit(next)
}

/// [`sort_and_resolve`], skipped when a nudge lands past the time limit.
fn resolve_within_limit(points: Vec<CurvePoint>) -> EditOutcome<Vec<CurvePoint>> {
    let resolved = sort_and_resolve(points);
    let last_sec = resolved.last().map_or(0.0, |p| p.sec);
    match SkipReason::check_time(last_sec) {
        Some(reason) => EditOutcome::skip(reason),
        None => EditOutcome::Applied(resolved),
    }
}

/// Set the transition of segment `segment_index`, i.e. the right transition
/// of the point at that index. `param` is clamped into `[-1, 1]`.
pub fn update_segment_transition(
    points: &[CurvePoint],
    segment_index: usize,
    kind: TransitionType,
    param: f64,
) -> EditOutcome<Vec<CurvePoint>> {
    if segment_index >= points.len() {
        return EditOutcome::skip(SkipReason::SegmentOutOfRange {
            index: segment_index,
            len: points.len(),
        });
    }

    let mut next = points.to_vec();
    next[segment_index].right_transition = Transition::new(kind, clamp_param(param));
    EditOutcome::Applied(next)
}
