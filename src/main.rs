//! Formmap CLI
//!
//! Command-line interface for form map project files.

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::debug;

use formmap::cli::{commands, Cli, Commands};
use formmap::RepairConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("formmap-cli v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => RepairConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RepairConfig::default(),
    };

    handle_command(cli.command, &config)
}

fn handle_command(cmd: Commands, config: &RepairConfig) -> anyhow::Result<()> {
    match cmd {
        Commands::Repair {
            input,
            output,
            in_place,
        } => commands::repair(&input, output.as_deref(), in_place, config)
            .with_context(|| format!("failed to repair {}", input.display()))?,
        Commands::Check { path } => {
            let summary = commands::check(&path, config)?;
            if summary.has_rejections() {
                bail!("{} file(s) were rejected", summary.rejected);
            }
        }
        Commands::Demo { output } => commands::demo(output.as_deref(), config)?,
        Commands::Info { input } => commands::info(&input, config)
            .with_context(|| format!("failed to read {}", input.display()))?,
    }
    Ok(())
}
