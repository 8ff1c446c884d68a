//! Timeline Model
//!
//! Sections, the energy curve and the project document, together with the
//! edit operations that keep them structurally valid.

pub mod curve;
pub mod ids;
pub mod outcome;
pub mod palette;
pub mod project;
pub mod sections;
pub mod types;
pub mod values;

pub use curve::{add_curve_point, move_curve_point, sort_and_resolve, update_segment_transition, AddedPoint};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use outcome::{EditOutcome, SkipReason};
pub use palette::{Palette, PaletteEntry};
pub use project::{Project, DEFAULT_TITLE, SUPPORTED_SCHEMA_VERSION};
pub use sections::{enforce_gapless, insert_section_at_boundary, ripple_resize, SectionDetails};
pub use types::{
    CurvePoint, EnergyCurve, Section, TempoModel, TimeSignature, TimebaseView, Transition,
    TransitionType,
};
pub use values::{MAX_TIME_SEC, MIN_SECTION_SEC, TIE_EPSILON};
