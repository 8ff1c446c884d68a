//! Project Document
//!
//! The root of a form map: metadata, tempo, the section timeline and the
//! energy curve. Updates go through the functions below, each of which
//! returns a new project that still satisfies the timeline and curve
//! invariants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::curve::{self, AddedPoint};
use crate::model::ids::{fresh_id, IdGenerator};
use crate::model::outcome::{EditOutcome, SkipReason};
use crate::model::palette::FALLBACK_COLOR_ID;
use crate::model::sections::{self, SectionDetails};
use crate::model::types::{
    CurvePoint, EnergyCurve, Section, TempoModel, TimebaseView, TransitionType,
};
use crate::model::values::clamp;

/// The only project document version this crate reads and writes.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Title used when a project has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Prefix of generated section ids.
pub const SECTION_ID_PREFIX: &str = "sec";

/// Length of the placeholder section of an otherwise empty timeline.
pub const PLACEHOLDER_SECTION_SEC: f64 = 4.0;

/// Root project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub schema_version: u32,
    pub title: String,
    pub composer_or_artist: String,
    pub project_notes: String,
    pub timebase_view: TimebaseView,
    pub tempo_model: TempoModel,
    pub sections: Vec<Section>,
    pub energy_curve: EnergyCurve,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for Project {
    fn default() -> Self {
        Self::blank()
    }
}

impl Project {
    /// An untitled project with a single placeholder section.
    pub fn blank() -> Self {
        Self {
            schema_version: SUPPORTED_SCHEMA_VERSION,
            title: DEFAULT_TITLE.to_string(),
            composer_or_artist: String::new(),
            project_notes: String::new(),
            timebase_view: TimebaseView::Time,
            tempo_model: TempoModel::default(),
            sections: vec![placeholder_section(FALLBACK_COLOR_ID)],
            energy_curve: EnergyCurve::default(),
            extra: BTreeMap::new(),
        }
    }

    /// The demo form shown on first launch.
    pub fn demo() -> Self {
        let tagged = |mut section: Section, tag: &str| {
            section.tags = vec![tag.to_string()];
            section
        };
        Self {
            schema_version: SUPPORTED_SCHEMA_VERSION,
            title: "Demo Form".to_string(),
            composer_or_artist: "Unknown".to_string(),
            project_notes: "Adjust sections and curve in the foundation build.".to_string(),
            timebase_view: TimebaseView::Time,
            tempo_model: TempoModel::default(),
            sections: vec![
                tagged(Section::new("sec-intro", "Intro", "navy_01", 0.0, 8.0), "intro"),
                tagged(Section::new("sec-verse", "Verse", "forest_01", 8.0, 24.0), "verse"),
                tagged(
                    Section::new("sec-chorus", "Chorus", "maroon_01", 24.0, 40.0),
                    "chorus",
                ),
            ],
            energy_curve: EnergyCurve {
                points: vec![
                    CurvePoint::new("p1", 0.0, 0.2),
                    CurvePoint::new("p2", 8.0, 0.35).with_transition(TransitionType::Curve, 0.4),
                    CurvePoint::new("p3", 24.0, 0.75).with_transition(TransitionType::Step, 0.0),
                    CurvePoint::new("p4", 40.0, 0.6),
                ],
                ..EnergyCurve::default()
            },
            extra: BTreeMap::new(),
        }
    }

    /// Latest time covered by either the sections or the curve.
    pub fn end_sec(&self) -> f64 {
        let section_end = self.sections.last().map_or(0.0, |s| s.end_sec);
        let curve_end = self.energy_curve.last_sec().unwrap_or(0.0);
        section_end.max(curve_end)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn curve_point(&self, id: &str) -> Option<&CurvePoint> {
        self.energy_curve.points.iter().find(|p| p.id == id)
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Set the title; an empty title falls back to [`DEFAULT_TITLE`].
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        };
        self
    }

    pub fn with_composer(mut self, composer_or_artist: impl Into<String>) -> Self {
        self.composer_or_artist = composer_or_artist.into();
        self
    }

    pub fn with_notes(mut self, project_notes: impl Into<String>) -> Self {
        self.project_notes = project_notes.into();
        self
    }

    pub fn with_timebase_view(mut self, view: TimebaseView) -> Self {
        self.timebase_view = view;
        self
    }

    /// Set the tempo; unusable numeric components fall back to defaults.
    pub fn with_tempo_model(mut self, tempo: TempoModel) -> Self {
        self.tempo_model = tempo.normalized();
        self
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    /// Ripple-resize the end of section `id`.
    pub fn resize_section(&self, id: &str, new_end_sec: f64) -> EditOutcome<Project> {
        sections::ripple_resize(&self.sections, id, new_end_sec)
            .map(|sections| self.with_sections(sections))
    }

    /// Insert a section after `boundary_index`, with an id from `ids`.
    ///
    /// Returns the new project and the id of the inserted section.
    pub fn insert_section(
        &self,
        boundary_index: usize,
        duration_sec: f64,
        name: &str,
        color_id: &str,
        ids: &mut impl IdGenerator,
    ) -> EditOutcome<(Project, String)> {
        if boundary_index >= self.sections.len() {
            return EditOutcome::skip(SkipReason::BoundaryOutOfRange {
                index: boundary_index,
                len: self.sections.len(),
            });
        }
        let id = fresh_id(ids, SECTION_ID_PREFIX, |candidate| {
            self.section(candidate).is_some()
        });
        sections::insert_section_at_boundary(
            &self.sections,
            boundary_index,
            duration_sec,
            &id,
            name,
            color_id,
        )
        .map(|sections| (self.with_sections(sections), id))
    }

    /// Change the name, colour, notes or tags of section `id`.
    pub fn update_section_details(
        &self,
        id: &str,
        details: SectionDetails,
    ) -> EditOutcome<Project> {
        sections::update_section_details(&self.sections, id, details)
            .map(|sections| self.with_sections(sections))
    }

    fn with_sections(&self, sections: Vec<Section>) -> Project {
        Project {
            sections,
            ..self.clone()
        }
    }

    // ------------------------------------------------------------------
    // Energy curve
    // ------------------------------------------------------------------

    /// Add a curve point; `y` is clamped into the curve's range.
    ///
    /// Returns the new project and the id of the added point.
    pub fn add_curve_point(
        &self,
        sec: f64,
        y: f64,
        ids: &mut impl IdGenerator,
    ) -> EditOutcome<(Project, String)> {
        let curve = &self.energy_curve;
        curve::add_curve_point(&curve.points, sec, y, curve.y_min, curve.y_max, ids)
            .map(|AddedPoint { points, id }| (self.with_points(points), id))
    }

    /// Move curve point `id` to `(sec, y)`.
    pub fn move_curve_point(&self, id: &str, sec: f64, y: f64) -> EditOutcome<Project> {
        let curve = &self.energy_curve;
        curve::move_curve_point(&curve.points, id, sec, y, curve.y_min, curve.y_max)
            .map(|points| self.with_points(points))
    }

    /// Set the transition of segment `segment_index`.
    pub fn set_segment_transition(
        &self,
        segment_index: usize,
        kind: TransitionType,
        param: f64,
    ) -> EditOutcome<Project> {
        curve::update_segment_transition(&self.energy_curve.points, segment_index, kind, param)
            .map(|points| self.with_points(points))
    }

    /// Change the curve's value range, clamping every point into it.
    pub fn with_curve_range(&self, y_min: f64, y_max: f64) -> EditOutcome<Project> {
        if !(y_min.is_finite() && y_max.is_finite() && y_max > y_min) {
            return EditOutcome::skip(SkipReason::InvalidRange {
                min: y_min,
                max: y_max,
            });
        }
        let points = self
            .energy_curve
            .points
            .iter()
            .map(|p| CurvePoint {
                y: clamp(p.y, y_min, y_max),
                ..p.clone()
            })
            .collect();
        let mut next = self.with_points(points);
        next.energy_curve.y_min = y_min;
        next.energy_curve.y_max = y_max;
        EditOutcome::Applied(next)
    }

    fn with_points(&self, points: Vec<CurvePoint>) -> Project {
        let mut next = self.clone();
        next.energy_curve.points = points;
        next
    }
}

/// The single section given to a timeline that has none.
pub(crate) fn placeholder_section(color_id: &str) -> Section {
    Section::new(
        format!("{SECTION_ID_PREFIX}-1"),
        "Section 1",
        color_id,
        0.0,
        PLACEHOLDER_SECTION_SEC,
    )
}
