//! CLI Module
//!
//! Command-line interface for checking, repairing and inspecting form map
//! project files.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Form map project tool
#[derive(Parser, Debug)]
#[command(name = "formmap-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Repair configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Repair a project file and write the canonical document
    #[command(name = "repair")]
    Repair {
        /// Project file to repair
        input: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite the input, keeping a timestamped backup
        #[arg(long)]
        in_place: bool,
    },

    /// Check a project file, or every project file under a directory
    #[command(name = "check")]
    Check {
        /// File or directory to check
        path: PathBuf,
    },

    /// Write the demo project
    #[command(name = "demo")]
    Demo {
        /// Write the project here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a summary of a project file
    #[command(name = "info")]
    Info {
        /// Project file to summarize
        input: PathBuf,
    },
}
