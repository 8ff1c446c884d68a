//! Formmap - Form Map Project Core
//!
//! Data model and editing rules for a form map: a song's structure drawn as
//! a gapless row of sections, with an energy curve laid over the same time
//! axis.
//!
//! # Architecture
//!
//! - `model`: sections, curve points and the project document, plus the
//!   pure edit operations that keep them valid
//! - `state`: repair of untrusted documents and JSON import/export
//! - `engine`: timebase labels, grid snapping and the viewport
//! - `cli`: the `formmap-cli` commands
//!
//! Every edit takes borrowed input and returns a new value; nothing is
//! mutated in place.

pub mod cli;
pub mod engine;
pub mod error;
pub mod model;
pub mod state;

pub use error::{FormMapError, Result};
pub use model::{EditOutcome, Project, SkipReason};
pub use state::{export_project, import_project, repair_project, RepairConfig, RepairReport};
