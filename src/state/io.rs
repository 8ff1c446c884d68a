//! Import/Export
//!
//! The only way documents enter or leave the crate. Both directions run
//! the repair pass, so whatever is handed to callers or written to disk is
//! canonical.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{FormMapError, Result};
use crate::model::project::{Project, DEFAULT_TITLE};
use crate::state::config::RepairConfig;
use crate::state::repair::{repair_project_with, RepairReport};

/// Suffix of project files, including the leading dot.
pub const PROJECT_FILE_SUFFIX: &str = ".formmapper.json";

/// Parse and repair a project document with the default configuration.
pub fn import_project(bytes: &[u8]) -> Result<RepairReport> {
    import_project_with(bytes, &RepairConfig::default())
}

/// Parse and repair a project document.
pub fn import_project_with(bytes: &[u8], config: &RepairConfig) -> Result<RepairReport> {
    let raw: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|source| FormMapError::Parse { source })?;
    let report = repair_project_with(&raw, config)?;

    info!(
        title = %report.project.title,
        warnings = report.warnings.len(),
        "imported project"
    );
    Ok(report)
}

/// Serialize a project as pretty-printed canonical JSON.
pub fn export_project(project: &Project) -> Result<String> {
    export_project_with(project, &RepairConfig::default())
}

/// Serialize a project as pretty-printed canonical JSON.
///
/// The project is repaired first. A project built through this crate's
/// edit functions is already canonical; anything that drifted (for example
/// a hand-edited non-finite time) is corrected and logged.
pub fn export_project_with(project: &Project, config: &RepairConfig) -> Result<String> {
    let raw = serde_json::to_value(project)?;
    let report = repair_project_with(&raw, config)?;

    if !report.is_clean() {
        warn!(
            title = %report.project.title,
            corrections = report.warnings.len(),
            "project drifted from canonical form before export"
        );
        for warning in &report.warnings {
            debug!(%warning, "export repair");
        }
    }

    Ok(serde_json::to_string_pretty(&report.project)?)
}

/// File name offered when saving `project`: its title with path separators
/// and other reserved characters replaced, plus [`PROJECT_FILE_SUFFIX`].
pub fn export_file_name(project: &Project) -> String {
    let cleaned: String = project
        .title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = cleaned.trim();
    let stem = if stem.is_empty() { DEFAULT_TITLE } else { stem };
    format!("{stem}{PROJECT_FILE_SUFFIX}")
}

/// Whether `path` looks like a project file.
pub fn is_project_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(PROJECT_FILE_SUFFIX))
}

/// Read and repair a project file with the default configuration.
pub fn load_project_file(path: &Path) -> Result<RepairReport> {
    load_project_file_with(path, &RepairConfig::default())
}

/// Read and repair a project file.
pub fn load_project_file_with(path: &Path, config: &RepairConfig) -> Result<RepairReport> {
    if !path.exists() {
        return Err(FormMapError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|e| FormMapError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "loading project file");
    import_project_with(&bytes, config)
}

/// Export `project` and write it to `path`.
pub fn save_project_file(path: &Path, project: &Project) -> Result<()> {
    let content = export_project(project)?;
    fs::write(path, content).map_err(|e| FormMapError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), title = %project.title, "saved project");
    Ok(())
}
