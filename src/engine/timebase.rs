//! Timebase conversions and axis labels.

use crate::model::types::{TempoModel, TimebaseView};

/// Length of one measure in seconds: `numerator * 60 / bpm`.
pub fn measure_duration_sec(tempo: &TempoModel) -> f64 {
    let beat_sec = 60.0 / tempo.bpm;
    tempo.time_sig.numerator * beat_sec
}

/// Whether `view` shows computed measures for `tempo`.
pub(crate) fn uses_computed_measures(view: TimebaseView, tempo: Option<&TempoModel>) -> bool {
    view == TimebaseView::MeasuresComputed && tempo.is_some_and(|t| t.enabled)
}

/// Axis label for `sec`.
///
/// - `M{n}`: computed measure number (tempo enabled).
/// - `m{n}`: abstract unit number.
/// - `m:ss`: wall-clock time, the fallback for everything else.
pub fn format_sec_label(sec: f64, view: TimebaseView, tempo: &TempoModel) -> String {
    if uses_computed_measures(view, Some(tempo)) {
        let measure = (sec / measure_duration_sec(tempo)).floor() as i64 + 1;
        return format!("M{measure}");
    }
    if view == TimebaseView::MeasuresAbstract {
        return format!("m{}", sec.floor() as i64 + 1);
    }

    let minutes = (sec / 60.0).floor() as i64;
    let seconds = (sec % 60.0).floor() as i64;
    format!("{minutes}:{seconds:02}")
}
