//! Section colour palette.
//!
//! Sections refer to colours by id. The table is handed to whatever needs to
//! resolve or default a colour; there is no global palette.

use serde::{Deserialize, Serialize};

/// Colour id used when a palette has no entries.
pub const FALLBACK_COLOR_ID: &str = "slate_01";

/// One palette colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub id: String,
    pub color_value: String,
}

impl PaletteEntry {
    pub fn new(id: impl Into<String>, color_value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            color_value: color_value.into(),
        }
    }
}

/// Read-only table of section colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(vec![
            PaletteEntry::new("slate_01", "#5c6773"),
            PaletteEntry::new("navy_01", "#2b3a55"),
            PaletteEntry::new("maroon_01", "#6b2737"),
            PaletteEntry::new("forest_01", "#2e473b"),
            PaletteEntry::new("beige_01", "#c4b299"),
        ])
    }
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn contains(&self, color_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == color_id)
    }

    /// Colour value for `color_id`, if the palette knows it.
    pub fn resolve(&self, color_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.id == color_id)
            .map(|entry| entry.color_value.as_str())
    }

    /// Colour value for `color_id`, falling back to the default colour.
    pub fn resolve_or_default(&self, color_id: &str) -> Option<&str> {
        self.resolve(color_id)
            .or_else(|| self.entries.first().map(|entry| entry.color_value.as_str()))
    }

    /// Id given to sections whose colour is missing.
    pub fn default_color_id(&self) -> &str {
        self.entries
            .first()
            .map(|entry| entry.id.as_str())
            .unwrap_or(FALLBACK_COLOR_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.entries().len(), 5);
        assert_eq!(palette.default_color_id(), "slate_01");
        assert_eq!(palette.resolve("navy_01"), Some("#2b3a55"));
        assert_eq!(palette.resolve("teal_99"), None);
        assert_eq!(palette.resolve_or_default("teal_99"), Some("#5c6773"));
        assert!(palette.contains("beige_01"));
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let palette = Palette::new(Vec::new());
        assert_eq!(palette.default_color_id(), FALLBACK_COLOR_ID);
        assert_eq!(palette.resolve_or_default("navy_01"), None);
    }

    #[test]
    fn test_palette_serializes_as_list() {
        let palette = Palette::new(vec![PaletteEntry::new("ink", "#000000")]);
        let value = serde_json::to_value(&palette).unwrap();
        assert_eq!(value, serde_json::json!([{ "id": "ink", "colorValue": "#000000" }]));
    }
}
