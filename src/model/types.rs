//! Timeline Data Types
//!
//! Serializable shapes for tempo, sections and the energy curve. Field names
//! follow the camelCase project document format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default tempo in beats per minute.
pub const DEFAULT_BPM: f64 = 120.0;

/// Default time signature numerator and denominator.
pub const DEFAULT_TIME_SIG: (f64, f64) = (4.0, 4.0);

/// Labels used for the energy curve's value bands when none are given.
pub const DEFAULT_Y_BANDS: [&str; 3] = ["Low", "Medium", "High"];

/// How the time axis is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimebaseView {
    /// Wall-clock minutes and seconds.
    #[default]
    Time,

    /// Measures computed from the tempo model.
    MeasuresComputed,

    /// One abstract measure per time unit.
    MeasuresAbstract,
}

impl TimebaseView {
    pub const ALL: [TimebaseView; 3] = [
        TimebaseView::Time,
        TimebaseView::MeasuresComputed,
        TimebaseView::MeasuresAbstract,
    ];

    /// The document spelling of this view.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimebaseView::Time => "time",
            TimebaseView::MeasuresComputed => "measuresComputed",
            TimebaseView::MeasuresAbstract => "measuresAbstract",
        }
    }
}

impl fmt::Display for TimebaseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimebaseView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| format!("unknown timebase view: {s}"))
    }
}

/// Musical time signature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: f64,
    pub denominator: f64,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: DEFAULT_TIME_SIG.0,
            denominator: DEFAULT_TIME_SIG.1,
        }
    }
}

/// Tempo used to compute measure positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoModel {
    pub enabled: bool,
    pub bpm: f64,
    pub time_sig: TimeSignature,
}

impl Default for TempoModel {
    fn default() -> Self {
        Self {
            enabled: true,
            bpm: DEFAULT_BPM,
            time_sig: TimeSignature::default(),
        }
    }
}

impl TempoModel {
    /// Whether `value` is usable as a bpm or time signature component.
    pub fn is_valid_component(value: f64) -> bool {
        value.is_finite() && value > 0.0
    }

    /// Replace every unusable numeric component with its default.
    pub fn normalized(self) -> Self {
        let defaults = TempoModel::default();
        let pick = |value: f64, fallback: f64| {
            if Self::is_valid_component(value) {
                value
            } else {
                fallback
            }
        };
        Self {
            enabled: self.enabled,
            bpm: pick(self.bpm, defaults.bpm),
            time_sig: TimeSignature {
                numerator: pick(self.time_sig.numerator, defaults.time_sig.numerator),
                denominator: pick(self.time_sig.denominator, defaults.time_sig.denominator),
            },
        }
    }
}

/// A named, coloured span of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub color_id: String,
    pub start_sec: f64,
    pub end_sec: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Section {
    /// Create a section with empty notes and tags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color_id: impl Into<String>,
        start_sec: f64,
        end_sec: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color_id: color_id.into(),
            start_sec,
            end_sec,
            notes: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_sec - self.start_sec
    }

    /// Whether `sec` falls inside `[start_sec, end_sec)`.
    pub fn contains(&self, sec: f64) -> bool {
        sec >= self.start_sec && sec < self.end_sec
    }
}

/// Interpolation rule between a curve point and its right neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    #[default]
    Linear,
    Step,
    Curve,
}

impl TransitionType {
    pub const ALL: [TransitionType; 3] = [
        TransitionType::Linear,
        TransitionType::Step,
        TransitionType::Curve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionType::Linear => "linear",
            TransitionType::Step => "step",
            TransitionType::Curve => "curve",
        }
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown transition type: {s}"))
    }
}

/// Transition applied to the segment to the right of a point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: TransitionType,

    /// Bias in `[-1, 1]`; only meaningful for [`TransitionType::Curve`].
    pub param: f64,
}

impl Transition {
    pub fn new(kind: TransitionType, param: f64) -> Self {
        Self { kind, param }
    }
}

/// A control point of the energy curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub id: String,
    pub sec: f64,
    pub y: f64,
    pub right_transition: Transition,
}

impl CurvePoint {
    /// Create a point with a linear outgoing transition.
    pub fn new(id: impl Into<String>, sec: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            sec,
            y,
            right_transition: Transition::default(),
        }
    }

    pub fn with_transition(mut self, kind: TransitionType, param: f64) -> Self {
        self.right_transition = Transition::new(kind, param);
        self
    }
}

/// Piecewise energy curve drawn over the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyCurve {
    pub y_bands: Vec<String>,
    pub y_min: f64,
    pub y_max: f64,
    pub points: Vec<CurvePoint>,
}

impl Default for EnergyCurve {
    fn default() -> Self {
        Self {
            y_bands: DEFAULT_Y_BANDS.iter().map(|band| band.to_string()).collect(),
            y_min: 0.0,
            y_max: 1.0,
            points: Vec::new(),
        }
    }
}

impl EnergyCurve {
    /// Time of the latest control point, if any.
    pub fn last_sec(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.sec)
            .fold(None, |acc: Option<f64>, sec| Some(acc.map_or(sec, |a| a.max(sec))))
    }
}
