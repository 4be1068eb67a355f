//! Freehand signature capture on top of a Canvas-2D-shaped drawing surface.
//!
//! A [`SignaturePad`] turns pointer and touch input into strokes, keeps them as
//! an ordered history, implements undo by clearing and replaying that history,
//! composites uploaded images with an aspect-preserving fit, and exports the
//! result as a PNG data URL. Drawing goes through the traits in [`api`], so the
//! same session logic runs against the software rasterizer, cairo, or the
//! recording backend used in tests.

pub mod api;
pub mod color;
pub mod config;
pub mod dialog;
pub mod error;
pub mod geometry;
pub mod pad;
pub mod stroke;
pub mod theme;
pub mod upload;

pub mod backends {
    #[cfg(feature = "cairo")]
    pub mod cairo;
    #[cfg(feature = "raster")]
    pub mod raster;
    pub mod recording;
}

pub use config::{BACKING_SCALE, SignatureConfig};
pub use dialog::SignatureDialog;
pub use error::{Result, SignatureError};
pub use geometry::{ClientRect, InputEvent, Placement, Point, TouchPoint};
pub use pad::SignaturePad;
pub use stroke::{Stroke, StrokeHistory};
pub use theme::{StrokePalette, ThemeMode};
