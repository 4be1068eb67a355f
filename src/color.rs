//! CSS color parsing shared by the pixel backends and config validation.

use crate::error::{Result, SignatureError};

/// Parses any CSS color string: hex forms, named colors, `rgb()`, `hsl()`
/// and the rest of what `csscolorparser` understands.
pub fn parse_color(color: &str) -> Result<csscolorparser::Color> {
    csscolorparser::parse(color.trim())
        .map_err(|e| SignatureError::InvalidColor(format!("{}: {}", color, e)))
}
