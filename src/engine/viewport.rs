//! Viewport over the timeline: horizontal pan and zoom.

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 20.0;

/// Pixels per second at zoom 1.
pub const BASE_PIXELS_PER_SECOND: f64 = 64.0;

pub fn clamp_zoom(zoom_x: f64) -> f64 {
    zoom_x.max(MIN_ZOOM).min(MAX_ZOOM)
}

pub fn clamp_pan(pan_sec: f64) -> f64 {
    pan_sec.max(0.0)
}

/// Visible window of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    /// Time at the left edge, never negative.
    pub pan_sec: f64,

    /// Scale factor in `[MIN_ZOOM, MAX_ZOOM]`; 1 is the base scale.
    pub zoom_x: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan_sec: 0.0,
            zoom_x: 1.0,
        }
    }
}

impl ViewportState {
    /// Create a viewport, clamping both values.
    pub fn new(pan_sec: f64, zoom_x: f64) -> Self {
        Self {
            pan_sec: clamp_pan(pan_sec),
            zoom_x: clamp_zoom(zoom_x),
        }
    }

    pub fn panned_by(self, delta_sec: f64) -> Self {
        Self::new(self.pan_sec + delta_sec, self.zoom_x)
    }

    pub fn zoomed_by(self, factor: f64) -> Self {
        Self::new(self.pan_sec, self.zoom_x * factor)
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.zoom_x * BASE_PIXELS_PER_SECOND
    }

    /// Horizontal pixel offset of `sec` from the left edge.
    pub fn sec_to_px(&self, sec: f64) -> f64 {
        (sec - self.pan_sec) * self.pixels_per_second()
    }

    pub fn px_to_sec(&self, px: f64) -> f64 {
        px / self.pixels_per_second() + self.pan_sec
    }
}
