//! Timeline Engine Module
//!
//! Helpers shared by anything that draws or edits the timeline:
//! - Measure durations and axis labels
//! - Grid steps and snapping
//! - Viewport pan and zoom

pub mod snapping;
pub mod timebase;
pub mod viewport;

pub use snapping::{grid_step_sec, snap_sec, time_step_for_zoom, TIME_STEPS};
pub use timebase::{format_sec_label, measure_duration_sec};
pub use viewport::{clamp_pan, clamp_zoom, ViewportState};
