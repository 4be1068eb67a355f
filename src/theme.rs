//! Stroke color selection by color scheme.
//!
//! The pad never inspects ambient state; whoever owns the theme resolves a
//! [`ThemeMode`] and pushes it in with `SignaturePad::set_theme`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Resolves a document-level theme attribute, deferring to the system
    /// preference only when the attribute is absent.
    pub fn resolve(attribute: Option<&str>, prefers_dark: bool) -> Self {
        match attribute {
            Some("dark") => ThemeMode::Dark,
            Some(_) => ThemeMode::Light,
            None if prefers_dark => ThemeMode::Dark,
            None => ThemeMode::Light,
        }
    }
}

/// Ink colors for each scheme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokePalette {
    pub light: String,
    pub dark: String,
}

impl StrokePalette {
    pub fn color_for(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

impl Default for StrokePalette {
    fn default() -> Self {
        Self {
            light: "#000000".to_string(),
            dark: "#ffffff".to_string(),
        }
    }
}
