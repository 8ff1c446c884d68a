//! Repair configuration.
//!
//! Policy that callers may swap out: the colour palette and the defaults
//! given to missing metadata. The structural constants (schema version,
//! minimum section length, tie epsilon) are fixed and live in `model`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormMapError, Result};
use crate::model::palette::Palette;
use crate::model::project::DEFAULT_TITLE;
use crate::model::types::DEFAULT_Y_BANDS;

/// Settings consulted while repairing a project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairConfig {
    /// Colour table; its first entry colours defaulted sections.
    pub palette: Palette,

    /// Title given to projects without one.
    pub default_title: String,

    /// Band labels given to curves without any.
    pub default_y_bands: Vec<String>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            default_title: DEFAULT_TITLE.to_string(),
            default_y_bands: DEFAULT_Y_BANDS.iter().map(|band| band.to_string()).collect(),
        }
    }
}

impl RepairConfig {
    /// Read a configuration from a JSON file. Missing keys keep defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FormMapError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| FormMapError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: RepairConfig =
            serde_json::from_str(&content).map_err(|source| FormMapError::Parse { source })?;
        tracing::debug!(
            path = %path.display(),
            palette_entries = config.palette.entries().len(),
            "loaded repair config"
        );
        Ok(config)
    }

    /// Band labels for defaulted curves; never empty.
    pub fn y_bands(&self) -> Vec<String> {
        if self.default_y_bands.is_empty() {
            DEFAULT_Y_BANDS.iter().map(|band| band.to_string()).collect()
        } else {
            self.default_y_bands.clone()
        }
    }

    /// Title for projects without one; never empty.
    pub fn title(&self) -> &str {
        if self.default_title.is_empty() {
            DEFAULT_TITLE
        } else {
            &self.default_title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::palette::PaletteEntry;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = RepairConfig::default();
        assert_eq!(config.title(), "Untitled");
        assert_eq!(config.y_bands(), vec!["Low", "Medium", "High"]);
        assert_eq!(config.palette.default_color_id(), "slate_01");
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = RepairConfig {
            palette: Palette::new(Vec::new()),
            default_title: String::new(),
            default_y_bands: Vec::new(),
        };
        assert_eq!(config.title(), "Untitled");
        assert_eq!(config.y_bands().len(), 3);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "palette": [{{ "id": "ink", "colorValue": "#101010" }}], "defaultTitle": "Sketch" }}"##
        )
        .unwrap();

        let config = RepairConfig::load(file.path()).unwrap();
        assert_eq!(
            config.palette.entries(),
            &[PaletteEntry::new("ink", "#101010")]
        );
        assert_eq!(config.title(), "Sketch");
        assert_eq!(config.y_bands(), vec!["Low", "Medium", "High"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RepairConfig::load(Path::new("/nonexistent/formmap.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = RepairConfig::load(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
