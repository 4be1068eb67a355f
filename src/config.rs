//! Pad configuration.
//!
//! Sizes are nominal CSS pixels; the backing store is always
//! [`BACKING_SCALE`] times larger on each axis so strokes stay crisp on
//! high-density displays.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{LineCap, LineJoin};
use crate::color;
use crate::error::{Result, SignatureError};
use crate::theme::{StrokePalette, ThemeMode};

/// Backing-store pixels per nominal pixel.
pub const BACKING_SCALE: u32 = 2;

/// Largest backing-store side a canvas may have.
pub const MAX_BACKING_DIMENSION: u32 = 32767;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Nominal (displayed) width
    pub width: u32,
    /// Nominal (displayed) height
    pub height: u32,
    /// Stroke thickness in backing-store pixels
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub palette: StrokePalette,
    /// Initial color scheme
    pub theme: ThemeMode,
    /// Close the dialog once a signature has been saved
    pub close_on_save: bool,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 200,
            line_width: 4.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            palette: StrokePalette::default(),
            theme: ThemeMode::Light,
            close_on_save: false,
        }
    }
}

impl SignatureConfig {
    /// Saturates instead of overflowing; `validate` rejects such sizes.
    pub fn backing_width(&self) -> u32 {
        self.width.saturating_mul(BACKING_SCALE)
    }

    pub fn backing_height(&self) -> u32 {
        self.height.saturating_mul(BACKING_SCALE)
    }

    pub fn stroke_color(&self) -> &str {
        self.palette.color_for(self.theme)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SignatureError::Config(format!(
                "canvas size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        for (axis, nominal) in [("width", self.width), ("height", self.height)] {
            let backing = nominal
                .checked_mul(BACKING_SCALE)
                .filter(|px| *px <= MAX_BACKING_DIMENSION);
            if backing.is_none() {
                return Err(SignatureError::Config(format!(
                    "canvas {} {} exceeds the {}px backing-store limit",
                    axis, nominal, MAX_BACKING_DIMENSION
                )));
            }
        }
        for color in [&self.palette.light, &self.palette.dark] {
            color::parse_color(color)?;
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(SignatureError::Config(format!(
                "line width must be positive, got {}",
                self.line_width
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON document; missing fields take defaults.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
