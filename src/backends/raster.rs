//! Software RGBA8 backend over a `tiny_skia::Pixmap`.
//!
//! Paints with anti-aliasing off: a pixel is inked when its center lies inside
//! the stroked outline. Output is a pure function of the call sequence, so two
//! canvases fed the same calls compare equal byte for byte.

use png::{BitDepth, ColorType, Encoder as PngEncoder};
use tiny_skia::{
    BlendMode, Color, ColorU8, FilterQuality, IntSize, Paint, PathBuilder, Pattern, Pixmap, Rect,
    SpreadMode, Stroke, Transform,
};
use tracing::debug;

use crate::api::*;
use crate::color::parse_color;
use crate::config::MAX_BACKING_DIMENSION;
use crate::error::{Result, SignatureError};

pub struct RasterCanvas {
    pixmap: Pixmap,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    stroke_style: String,
    stroke_color: Color,
    path: PathBuilder,
    has_current_point: bool,
}

impl RasterCanvas {
    /// Creates a fully transparent canvas with the given backing-store size.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width > MAX_BACKING_DIMENSION || height > MAX_BACKING_DIMENSION {
            return Err(SignatureError::Backend(
                format!(
                    "canvas {}x{} exceeds the {}px limit",
                    width, height, MAX_BACKING_DIMENSION
                )
                .into(),
            ));
        }
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            SignatureError::Backend(format!("cannot allocate a {}x{} canvas", width, height).into())
        })?;
        Ok(Self {
            pixmap,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            stroke_style: "#000000".to_string(),
            stroke_color: Color::BLACK,
            path: PathBuilder::new(),
            has_current_point: false,
        })
    }

    /// Straight-alpha RGBA8 copy of the backing store, row-major.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|px| px.alpha() == 0)
    }

    fn ink(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.stroke_color);
        paint.anti_alias = false;
        paint
    }

    fn outline(&self) -> Stroke {
        Stroke {
            width: self.line_width as f32,
            line_cap: match self.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.line_join {
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
            },
            ..Stroke::default()
        }
    }
}

/// Premultiplies straight RGBA into a pixmap tiny-skia can sample.
fn pixmap_from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Pixmap> {
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| SignatureError::Other("image has no area".into()))?;
    let premultiplied = data
        .chunks_exact(4)
        .flat_map(|px| {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(premultiplied, size)
        .ok_or_else(|| SignatureError::Other("image does not fit a pixmap".into()))
}

impl CanvasLineStyles for RasterCanvas {
    fn set_line_width(&mut self, value: f64) -> Result<()> {
        if value.is_finite() && value > 0.0 {
            self.line_width = value;
        }
        Ok(())
    }

    fn line_width(&self) -> Result<f64> {
        Ok(self.line_width)
    }

    fn set_line_cap(&mut self, value: LineCap) -> Result<()> {
        self.line_cap = value;
        Ok(())
    }

    fn line_cap(&self) -> Result<LineCap> {
        Ok(self.line_cap)
    }

    fn set_line_join(&mut self, value: LineJoin) -> Result<()> {
        self.line_join = value;
        Ok(())
    }

    fn line_join(&self) -> Result<LineJoin> {
        Ok(self.line_join)
    }
}

impl CanvasStrokeStyles for RasterCanvas {
    /// Unparseable colors are ignored and the previous style is kept.
    fn set_stroke_style(&mut self, color: &str) -> Result<()> {
        match parse_color(color) {
            Ok(parsed) => {
                let [r, g, b, a] = parsed.to_rgba8();
                self.stroke_color = Color::from_rgba8(r, g, b, a);
                self.stroke_style = color.to_string();
            }
            Err(err) => debug!(%err, "stroke style ignored"),
        }
        Ok(())
    }

    fn stroke_style(&self) -> Result<String> {
        Ok(self.stroke_style.clone())
    }
}

impl CanvasRectangles for RasterCanvas {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let (x0, x1) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0.0 { (y + h, y) } else { (y, y + h) };
        let (cw, ch) = (self.pixmap.width() as f64, self.pixmap.height() as f64);
        if x0 <= 0.0 && y0 <= 0.0 && x1 >= cw && y1 >= ch {
            self.pixmap.fill(Color::TRANSPARENT);
            return Ok(());
        }

        let Some(rect) = Rect::from_ltrb(x0 as f32, y0 as f32, x1 as f32, y1 as f32) else {
            return Ok(());
        };
        let paint = Paint {
            blend_mode: BlendMode::Clear,
            anti_alias: false,
            ..Paint::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }
}

impl CanvasPaths for RasterCanvas {
    fn begin_path(&mut self) -> Result<()> {
        self.path.clear();
        self.has_current_point = false;
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.path.move_to(x as f32, y as f32);
        self.has_current_point = true;
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        if self.has_current_point {
            self.path.line_to(x as f32, y as f32);
            Ok(())
        } else {
            // lineTo on an empty path behaves like moveTo.
            self.move_to(x, y)
        }
    }

    fn stroke(&mut self) -> Result<()> {
        // The path stays current, so a repeated stroke() repaints it.
        let Some(path) = self.path.clone().finish() else {
            return Ok(());
        };
        let paint = self.ink();
        let outline = self.outline();
        self.pixmap
            .stroke_path(&path, &paint, &outline, Transform::identity(), None);
        Ok(())
    }
}

impl CanvasDrawImage for RasterCanvas {
    fn draw_image_scaled(
        &mut self,
        image: &dyn CanvasImageSource,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()> {
        let sw = image.width();
        let sh = image.height();
        let data = image
            .data_rgba()
            .ok_or_else(|| SignatureError::Other("CanvasImageSource missing RGBA data".into()))?;
        if data.len() != sw as usize * sh as usize * 4 {
            return Err(SignatureError::Other(
                "RGBA buffer length does not match width*height*4".into(),
            ));
        }
        if sw == 0 || sh == 0 || dw <= 0.0 || dh <= 0.0 {
            return Ok(());
        }
        let Some(dest) = Rect::from_xywh(dx as f32, dy as f32, dw as f32, dh as f32) else {
            return Ok(());
        };

        let source = pixmap_from_rgba(sw, sh, data)?;
        let to_dest = Transform::from_row(
            dw as f32 / sw as f32,
            0.0,
            0.0,
            dh as f32 / sh as f32,
            dx as f32,
            dy as f32,
        );
        let paint = Paint {
            shader: Pattern::new(
                source.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Nearest,
                1.0,
                to_dest,
            ),
            anti_alias: false,
            ..Paint::default()
        };
        self.pixmap
            .fill_rect(dest, &paint, Transform::identity(), None);
        Ok(())
    }
}

impl CanvasExport for RasterCanvas {
    fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        let mut encoder = PngEncoder::new(&mut png_bytes, self.pixmap.width(), self.pixmap.height());
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels())?;
        writer.finish()?;
        Ok(png_bytes)
    }
}

impl CanvasRenderingContext2D for RasterCanvas {
    fn canvas_width(&self) -> u32 {
        self.pixmap.width()
    }

    fn canvas_height(&self) -> u32 {
        self.pixmap.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn line(c: &mut RasterCanvas, pts: &[(f64, f64)]) {
        c.begin_path().unwrap();
        c.move_to(pts[0].0, pts[0].1).unwrap();
        for p in &pts[1..] {
            c.line_to(p.0, p.1).unwrap();
        }
        c.stroke().unwrap();
    }

    #[test]
    fn fresh_canvas_is_blank() {
        let c = RasterCanvas::new(8, 8).unwrap();
        assert!(c.is_blank());
        assert_eq!(c.pixels().len(), 8 * 8 * 4);
    }

    #[test]
    fn rejects_oversized_and_empty_canvases() {
        assert!(matches!(
            RasterCanvas::new(MAX_BACKING_DIMENSION + 1, 10),
            Err(SignatureError::Backend(_))
        ));
        assert!(RasterCanvas::new(0, 10).is_err());
    }

    #[test]
    fn horizontal_butt_line_covers_its_band() {
        let mut c = RasterCanvas::new(10, 10).unwrap();
        c.set_line_width(2.0).unwrap();
        line(&mut c, &[(1.0, 5.0), (9.0, 5.0)]);
        assert_eq!(c.pixel(4, 4), Some(BLACK));
        assert_eq!(c.pixel(4, 5), Some(BLACK));
        assert_eq!(c.pixel(4, 3), Some([0, 0, 0, 0]));
        // butt caps stop at the endpoints
        assert_eq!(c.pixel(0, 5), Some([0, 0, 0, 0]));
        assert_eq!(c.pixel(9, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn round_caps_extend_past_endpoints() {
        let mut c = RasterCanvas::new(12, 12).unwrap();
        c.set_line_width(4.0).unwrap();
        c.set_line_cap(LineCap::Round).unwrap();
        line(&mut c, &[(4.0, 6.0), (8.0, 6.0)]);
        assert_eq!(c.pixel(2, 6), Some(BLACK));
        assert_eq!(c.pixel(9, 6), Some(BLACK));
        assert_eq!(c.pixel(0, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn stroke_uses_current_color() {
        let mut c = RasterCanvas::new(10, 10).unwrap();
        c.set_line_width(3.0).unwrap();
        c.set_stroke_style("#ff0000").unwrap();
        line(&mut c, &[(0.0, 5.0), (10.0, 5.0)]);
        assert_eq!(c.pixel(5, 5), Some([255, 0, 0, 255]));
    }

    #[test]
    fn invalid_stroke_style_keeps_previous() {
        let mut c = RasterCanvas::new(10, 10).unwrap();
        c.set_line_width(3.0).unwrap();
        c.set_stroke_style("rgb(0, 0, 255)").unwrap();
        c.set_stroke_style("no such color").unwrap();
        assert_eq!(c.stroke_style().unwrap(), "rgb(0, 0, 255)");
        line(&mut c, &[(0.0, 5.0), (10.0, 5.0)]);
        assert_eq!(c.pixel(5, 5), Some([0, 0, 255, 255]));
    }

    #[test]
    fn clear_rect_wipes_region() {
        let mut c = RasterCanvas::new(10, 10).unwrap();
        c.set_line_width(10.0).unwrap();
        line(&mut c, &[(0.0, 5.0), (10.0, 5.0)]);
        c.clear_rect(0.0, 0.0, 5.0, 10.0).unwrap();
        assert_eq!(c.pixel(4, 5), Some([0, 0, 0, 0]));
        assert_eq!(c.pixel(5, 5), Some(BLACK));
        c.clear_rect(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(c.is_blank());
    }

    #[test]
    fn same_calls_same_pixels() {
        let draw = || {
            let mut c = RasterCanvas::new(40, 20).unwrap();
            c.set_line_width(4.0).unwrap();
            c.set_line_cap(LineCap::Round).unwrap();
            line(&mut c, &[(2.0, 3.0), (17.5, 12.25), (38.0, 4.0)]);
            c
        };
        assert_eq!(draw().pixels(), draw().pixels());
    }

    #[test]
    fn scaled_image_fills_destination() {
        let mut c = RasterCanvas::new(10, 10).unwrap();
        let img = ImageData {
            width: 1,
            height: 1,
            data: vec![0, 0, 255, 255],
        };
        c.draw_image_scaled(&img, 2.0, 3.0, 4.0, 2.0).unwrap();
        assert_eq!(c.pixel(2, 3), Some([0, 0, 255, 255]));
        assert_eq!(c.pixel(5, 4), Some([0, 0, 255, 255]));
        assert_eq!(c.pixel(6, 4), Some([0, 0, 0, 0]));
        assert_eq!(c.pixel(2, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn image_without_rgba_is_rejected() {
        struct Opaque;
        impl CanvasImageSource for Opaque {
            fn width(&self) -> u32 {
                1
            }
            fn height(&self) -> u32 {
                1
            }
            fn data_rgba(&self) -> Option<&[u8]> {
                None
            }
        }
        let mut c = RasterCanvas::new(4, 4).unwrap();
        assert!(c.draw_image_scaled(&Opaque, 0.0, 0.0, 4.0, 4.0).is_err());
    }

    #[test]
    fn half_alpha_blends_over_existing_ink() {
        let mut c = RasterCanvas::new(4, 4).unwrap();
        c.set_line_width(8.0).unwrap();
        c.set_stroke_style("#ffffff").unwrap();
        line(&mut c, &[(0.0, 2.0), (4.0, 2.0)]);
        c.set_stroke_style("#00000080").unwrap();
        line(&mut c, &[(0.0, 2.0), (4.0, 2.0)]);
        let [r, g, b, a] = c.pixel(1, 1).unwrap();
        assert_eq!(a, 255);
        assert!(r > 100 && r < 150, "{r}");
        assert_eq!((r, g), (g, b));
    }

    #[test]
    fn exports_png_data_url() {
        let mut c = RasterCanvas::new(6, 3).unwrap();
        c.set_line_width(2.0).unwrap();
        line(&mut c, &[(0.0, 1.5), (6.0, 1.5)]);
        let bytes = c.to_png_bytes().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let url = c.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let decoded = crate::upload::decode_data_url(&url).unwrap();
        assert_eq!(decoded.pixels(), c.pixels());
    }
}
