//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use walkdir::WalkDir;

use crate::engine::timebase::format_sec_label;
use crate::error::{FormMapError, Result};
use crate::model::palette::Palette;
use crate::model::project::Project;
use crate::state::config::RepairConfig;
use crate::state::io::{export_project_with, is_project_file, load_project_file_with};

/// Repair a project file and write the canonical document.
///
/// Output goes to `output`, back over `input` (after a backup) when
/// `in_place` is set, or to stdout.
pub fn repair(
    input: &Path,
    output: Option<&Path>,
    in_place: bool,
    config: &RepairConfig,
) -> Result<()> {
    info!("Repairing project: {}", input.display());

    let report = load_project_file_with(input, config)?;
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    let content = export_project_with(&report.project, config)?;

    if in_place {
        let backup = backup_path(input, Utc::now());
        fs::copy(input, &backup).map_err(|e| FormMapError::FileWriteError {
            path: backup.clone(),
            source: e,
        })?;
        write_file(input, &content)?;
        println!(
            "Repaired {} ({} warning(s)); backup at {}",
            input.display(),
            report.warnings.len(),
            backup.display()
        );
    } else if let Some(output) = output {
        write_file(output, &content)?;
        println!(
            "Repaired {} -> {} ({} warning(s))",
            input.display(),
            output.display(),
            report.warnings.len()
        );
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Backup location for `path`: `<file>.bak-YYYYmmdd_HHMMSS` next to it.
pub fn backup_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let timestamp = now.format("%Y%m%d_%H%M%S");
    path.with_file_name(format!("{}.bak-{}", file_name, timestamp))
}

/// Totals from [`check`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub checked: usize,
    pub clean: usize,
    pub repaired: usize,
    pub rejected: usize,
}

impl CheckSummary {
    pub fn has_rejections(&self) -> bool {
        self.rejected > 0
    }
}

/// Check one project file, or every project file under a directory.
pub fn check(path: &Path, config: &RepairConfig) -> Result<CheckSummary> {
    info!("Checking: {}", path.display());

    if !path.exists() {
        return Err(FormMapError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let files = project_files(path);
    let mut summary = CheckSummary::default();

    for file in files {
        summary.checked += 1;
        match load_project_file_with(&file, config) {
            Ok(report) if report.is_clean() => {
                summary.clean += 1;
                println!("ok       {}", file.display());
            }
            Ok(report) => {
                summary.repaired += 1;
                println!(
                    "repaired {} ({} warning(s))",
                    file.display(),
                    report.warnings.len()
                );
                for warning in &report.warnings {
                    println!("         - {}", warning);
                }
            }
            Err(e) => {
                summary.rejected += 1;
                warn!("{}: {}", file.display(), e);
                println!("rejected {}: {}", file.display(), e);
            }
        }
    }

    println!("{:-<60}", "");
    println!(
        "Checked: {} | Clean: {} | Repaired: {} | Rejected: {}",
        summary.checked, summary.clean, summary.repaired, summary.rejected
    );

    Ok(summary)
}

/// `path` itself when it is a file, otherwise every project file below it
/// in a stable order.
fn project_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_project_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Write the demo project.
pub fn demo(output: Option<&Path>, config: &RepairConfig) -> Result<()> {
    let content = export_project_with(&Project::demo(), config)?;

    match output {
        Some(output) => {
            write_file(output, &content)?;
            println!("Demo project written: {}", output.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Print a summary of a project file.
pub fn info(input: &Path, config: &RepairConfig) -> Result<()> {
    info!("Reading project: {}", input.display());

    let report = load_project_file_with(input, config)?;
    print!("{}", describe_project(&report.project, &config.palette));
    if !report.is_clean() {
        println!(
            "\n{} repair warning(s); run `repair` to fix the file.",
            report.warnings.len()
        );
    }

    Ok(())
}

/// Human-readable summary used by `info`.
pub fn describe_project(project: &Project, palette: &Palette) -> String {
    let view = project.timebase_view;
    let tempo = &project.tempo_model;
    let label = |sec: f64| format_sec_label(sec, view, tempo);

    let mut lines = vec![format!("Title: {}", project.title)];
    if !project.composer_or_artist.is_empty() {
        lines.push(format!("Composer/Artist: {}", project.composer_or_artist));
    }
    lines.push(format!(
        "Tempo: {} bpm {}/{}{}",
        tempo.bpm,
        tempo.time_sig.numerator,
        tempo.time_sig.denominator,
        if tempo.enabled { "" } else { " (disabled)" }
    ));
    lines.push(format!("Timebase: {view}"));

    lines.push(format!("Sections: {}", project.sections.len()));
    lines.extend(project.sections.iter().map(|section| {
        let color = palette.resolve_or_default(&section.color_id).unwrap_or("-");
        format!(
            "  {:>6} - {:<6} {} [{} {}]",
            label(section.start_sec),
            label(section.end_sec),
            section.name,
            section.color_id,
            color
        )
    }));

    let curve = &project.energy_curve;
    lines.push(format!(
        "Curve points: {} (range {}..{}, bands {})",
        curve.points.len(),
        curve.y_min,
        curve.y_max,
        curve.y_bands.join("/")
    ));
    lines.push(format!("End: {}", label(project.end_sec())));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| FormMapError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::io::{load_project_file, save_project_file};
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 22).unwrap();
        let backup = backup_path(Path::new("/tmp/songs/demo.formmapper.json"), now);
        assert_eq!(
            backup,
            PathBuf::from("/tmp/songs/demo.formmapper.json.bak-20240115_143022")
        );
    }

    #[test]
    fn test_repair_in_place_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gap.formmapper.json");
        let original = r#"{
            "schemaVersion": 1,
            "sections": [
                { "id": "a", "name": "A", "colorId": "navy_01", "startSec": 0, "endSec": 4 },
                { "id": "b", "name": "B", "colorId": "navy_01", "startSec": 6, "endSec": 8 }
            ]
        }"#;
        fs::write(&path, original).unwrap();

        repair(&path, None, true, &RepairConfig::default()).unwrap();

        let report = load_project_file(&path).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.project.sections[1].start_sec, 4.0);

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".bak-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(backups[0].path()).unwrap(), original);
    }

    #[test]
    fn test_repair_to_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.formmapper.json");
        let output = dir.path().join("out.formmapper.json");
        fs::write(&input, r#"{ "schemaVersion": 1 }"#).unwrap();

        repair(&input, Some(&output), false, &RepairConfig::default()).unwrap();
        assert!(load_project_file(&output).unwrap().is_clean());
    }

    #[test]
    fn test_check_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        save_project_file(&dir.path().join("clean.formmapper.json"), &Project::demo()).unwrap();
        fs::write(
            nested.join("messy.formmapper.json"),
            r#"{ "schemaVersion": 1, "title": "Messy" }"#,
        )
        .unwrap();
        fs::write(
            nested.join("future.formmapper.json"),
            r#"{ "schemaVersion": 3 }"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.json"), "not a project").unwrap();

        let summary = check(dir.path(), &RepairConfig::default()).unwrap();
        assert_eq!(
            summary,
            CheckSummary {
                checked: 3,
                clean: 1,
                repaired: 1,
                rejected: 1,
            }
        );
        assert!(summary.has_rejections());
    }

    #[test]
    fn test_check_missing_path() {
        let err = check(Path::new("/nonexistent/songs"), &RepairConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_demo_written_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("demo.formmapper.json");
        demo(Some(&path), &RepairConfig::default()).unwrap();
        assert_eq!(load_project_file(&path).unwrap().project, Project::demo());
    }

    #[test]
    fn test_describe_project() {
        let summary = describe_project(&Project::demo(), &Palette::default());
        assert!(summary.contains("Title: Demo Form"));
        assert!(summary.contains("Tempo: 120 bpm 4/4"));
        assert!(summary.contains("Sections: 3"));
        assert!(summary.contains("Chorus [maroon_01 #6b2737]"));
        assert!(summary.contains("Curve points: 4"));
        assert!(summary.contains("End: 0:40"));
    }

    #[test]
    fn test_describe_project_one_line_per_entry() {
        let summary = describe_project(&Project::demo(), &Palette::default());
        let lines: Vec<&str> = summary.lines().collect();
        // title, composer, tempo, timebase, section count, 3 sections, curve, end
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "Composer/Artist: Unknown");
        assert!(summary.ends_with("End: 0:40\n"));

        let anonymous = Project::demo().with_composer("");
        let summary = describe_project(&anonymous, &Palette::default());
        assert!(!summary.contains("Composer/Artist"));
    }
}
