//! State Module
//!
//! Getting projects in and out: repair of untrusted documents, repair
//! configuration, and JSON import/export.

pub mod config;
pub mod io;
pub mod repair;

pub use config::RepairConfig;
pub use io::{
    export_file_name, export_project, export_project_with, import_project, import_project_with,
    is_project_file, load_project_file, load_project_file_with, save_project_file,
    PROJECT_FILE_SUFFIX,
};
pub use repair::{repair_project, repair_project_with, RepairReport, Repaired};
