//! The slice of the HTML Canvas 2D context surface that signature capture
//! draws through. Backends implement these traits; the pad only ever talks to
//! a `CanvasRenderingContext2D`.

use crate::error::Result;

/// Straight-alpha RGBA8 pixels, row-major from the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageData {
    /// Allocates a fully transparent buffer. Mirrors createImageData(width, height).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Round,
    Bevel,
    Miter,
}

pub trait CanvasLineStyles {
    /// Sets stroke thickness in backing-store pixels. Mirrors lineWidth.
    fn set_line_width(&mut self, value: f64) -> Result<()>;
    /// Returns the current stroke thickness. Mirrors lineWidth.
    fn line_width(&self) -> Result<f64>;

    /// Sets the shape of the line end caps. Mirrors lineCap.
    fn set_line_cap(&mut self, value: LineCap) -> Result<()>;
    /// Returns the current line cap. Mirrors lineCap.
    fn line_cap(&self) -> Result<LineCap>;

    /// Sets the shape used at line joins. Mirrors lineJoin.
    fn set_line_join(&mut self, value: LineJoin) -> Result<()>;
    /// Returns the current line join. Mirrors lineJoin.
    fn line_join(&self) -> Result<LineJoin>;
}

pub trait CanvasStrokeStyles {
    /// Sets the CSS color used for strokes. Mirrors strokeStyle.
    fn set_stroke_style(&mut self, color: &str) -> Result<()>;
    /// Returns the current stroke color. Mirrors strokeStyle.
    fn stroke_style(&self) -> Result<String>;
}

pub trait CanvasRectangles {
    /// Clears the specified rectangle to full transparency. Mirrors clearRect().
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()>;
}

pub trait CanvasPaths {
    /// Starts a new empty path list. Mirrors beginPath().
    fn begin_path(&mut self) -> Result<()>;
    /// Moves the current point without drawing. Mirrors moveTo().
    fn move_to(&mut self, x: f64, y: f64) -> Result<()>;
    /// Adds a straight line from the current point to (x, y). Mirrors lineTo().
    fn line_to(&mut self, x: f64, y: f64) -> Result<()>;
    /// Strokes the current path. Mirrors stroke().
    fn stroke(&mut self) -> Result<()>;
}

pub trait CanvasDrawImage {
    /// Draws and scales the source image to the given destination size. Mirrors drawImage(image, dx, dy, dw, dh).
    fn draw_image_scaled(
        &mut self,
        image: &dyn CanvasImageSource,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()>;
}

pub trait CanvasImageSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Returns a view over straight-alpha RGBA pixels.
    /// Length must be width * height * 4.
    fn data_rgba(&self) -> Option<&[u8]>;
}

impl CanvasImageSource for ImageData {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn data_rgba(&self) -> Option<&[u8]> {
        Some(self.data.as_slice())
    }
}

/// Serializes the backing store. Mirrors HTMLCanvasElement.toDataURL("image/png").
pub trait CanvasExport {
    fn to_png_bytes(&self) -> Result<Vec<u8>>;

    fn to_data_url(&self) -> Result<String> {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

        let encoded = BASE64_STANDARD.encode(self.to_png_bytes()?);
        Ok(format!("data:image/png;base64,{}", encoded))
    }
}

pub trait CanvasRenderingContext2D:
    CanvasLineStyles + CanvasStrokeStyles + CanvasRectangles + CanvasPaths + CanvasDrawImage
{
    /// Backing-store width in pixels. Mirrors HTMLCanvasElement.width.
    fn canvas_width(&self) -> u32;
    /// Backing-store height in pixels. Mirrors HTMLCanvasElement.height.
    fn canvas_height(&self) -> u32;
}
