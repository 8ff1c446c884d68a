//! Error handling for formmap
//!
//! Only fatal conditions are errors. Structural defects inside a document
//! are repaired and reported as warnings instead (see `state::repair`).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for formmap operations
pub type Result<T> = std::result::Result<T, FormMapError>;

/// Fatal errors raised by the import/export boundary and the repair gate
#[derive(Error, Debug)]
pub enum FormMapError {
    // Document Errors
    #[error("Project document is not valid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid project structure: {reason}")]
    InvalidProjectStructure { reason: String },

    #[error("Unsupported schemaVersion {found} (supported: {supported})")]
    UnsupportedSchemaVersion { found: String, supported: u32 },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormMapError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            FormMapError::Parse { .. } => "PARSE_ERROR",
            FormMapError::InvalidProjectStructure { .. } => "INVALID_PROJECT_STRUCTURE",
            FormMapError::UnsupportedSchemaVersion { .. } => "UNSUPPORTED_SCHEMA_VERSION",
            FormMapError::FileNotFound { .. } => "FILE_NOT_FOUND",
            FormMapError::FileReadError { .. } => "FILE_READ_ERROR",
            FormMapError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            FormMapError::Io(_) => "IO_ERROR",
            FormMapError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True for rejections of the document itself, as opposed to I/O trouble.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            FormMapError::Parse { .. }
                | FormMapError::InvalidProjectStructure { .. }
                | FormMapError::UnsupportedSchemaVersion { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            FormMapError::Parse { .. } => {
                Some("The file may be truncated or not a form map project. Check it in a text editor.")
            }
            FormMapError::InvalidProjectStructure { .. } => {
                Some("A project file must contain a single JSON object at the top level.")
            }
            FormMapError::UnsupportedSchemaVersion { .. } => {
                Some("This project was written by a different version of the editor.")
            }
            FormMapError::FileNotFound { .. } => Some("Check the file path and try again."),
            FormMapError::FileWriteError { .. } => {
                Some("Check that the destination directory exists and is writable.")
            }
            _ => None,
        }
    }
}
