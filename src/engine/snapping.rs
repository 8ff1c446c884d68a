//! Grid steps and snapping.
//!
//! In time view the grid step follows the zoom level; in measure views it
//! is one measure (computed) or one unit (abstract).

use crate::engine::timebase::{measure_duration_sec, uses_computed_measures};
use crate::model::types::{TempoModel, TimebaseView};

/// Candidate grid steps for time view, finest first.
pub const TIME_STEPS: [f64; 7] = [0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0];

/// Minimum zoom for each of the first six [`TIME_STEPS`]; below the last
/// threshold the coarsest step applies.
const ZOOM_THRESHOLDS: [f64; 6] = [6.0, 3.0, 1.5, 0.8, 0.4, 0.2];

/// Time-view grid step for `zoom_x`.
pub fn time_step_for_zoom(zoom_x: f64) -> f64 {
    ZOOM_THRESHOLDS
        .iter()
        .position(|&threshold| zoom_x >= threshold)
        .map_or(TIME_STEPS[TIME_STEPS.len() - 1], |index| TIME_STEPS[index])
}

/// Spacing of grid lines for the given view.
pub fn grid_step_sec(view: TimebaseView, tempo: Option<&TempoModel>, zoom_x: f64) -> f64 {
    match tempo {
        Some(tempo) if uses_computed_measures(view, Some(tempo)) => measure_duration_sec(tempo),
        _ if view == TimebaseView::MeasuresAbstract => 1.0,
        _ => time_step_for_zoom(zoom_x),
    }
}

/// Round `sec` to the nearest grid line.
pub fn snap_sec(sec: f64, view: TimebaseView, tempo: Option<&TempoModel>, zoom_x: f64) -> f64 {
    let step = grid_step_sec(view, tempo, zoom_x);
    (sec / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(20.0, 0.1)]
    #[test_case(6.0, 0.1)]
    #[test_case(3.0, 0.25)]
    #[test_case(1.5, 0.5)]
    #[test_case(1.0, 1.0)]
    #[test_case(0.5, 2.0)]
    #[test_case(0.2, 4.0)]
    #[test_case(0.1, 8.0)]
    fn test_time_step_for_zoom(zoom_x: f64, expected: f64) {
        assert_eq!(time_step_for_zoom(zoom_x), expected);
    }

    #[test]
    fn test_time_view_snapping_follows_zoom() {
        let tempo = TempoModel::default();
        assert_relative_eq!(snap_sec(1.24, TimebaseView::Time, Some(&tempo), 3.0), 1.25);
        assert_relative_eq!(snap_sec(1.24, TimebaseView::Time, Some(&tempo), 1.0), 1.0);
        assert_relative_eq!(snap_sec(1.24, TimebaseView::Time, None, 0.5), 2.0);
    }

    #[test]
    fn test_computed_measure_snapping() {
        let tempo = TempoModel::default();
        assert_relative_eq!(
            snap_sec(9.3, TimebaseView::MeasuresComputed, Some(&tempo), 1.0),
            10.0
        );
        assert_relative_eq!(
            grid_step_sec(TimebaseView::MeasuresComputed, Some(&tempo), 1.0),
            2.0
        );
    }

    #[test]
    fn test_computed_measures_without_tempo_use_time_steps() {
        assert_eq!(grid_step_sec(TimebaseView::MeasuresComputed, None, 3.0), 0.25);

        let disabled = TempoModel {
            enabled: false,
            ..TempoModel::default()
        };
        assert_eq!(
            grid_step_sec(TimebaseView::MeasuresComputed, Some(&disabled), 3.0),
            0.25
        );
    }

    #[test]
    fn test_abstract_snapping() {
        assert_eq!(snap_sec(3.6, TimebaseView::MeasuresAbstract, None, 1.0), 4.0);
        assert_eq!(grid_step_sec(TimebaseView::MeasuresAbstract, None, 8.0), 1.0);
    }
}
