//! Cairo backend behind the optional `cairo` crate feature. Draws into an
//! ARGB32 `ImageSurface` and exports it with cairo's own PNG writer.

use cairo::{
    Context, Extend, Filter, Format, ImageSurface, LineCap as CairoLineCap,
    LineJoin as CairoLineJoin, Operator, SurfacePattern,
};

use crate::api::*;
use crate::color::parse_color;
use crate::error::{Result, SignatureError};

/// Adapter that translates canvas calls into Cairo operations.
pub struct CairoCanvas {
    surface: ImageSurface,
    ctx: Context,
    stroke_style: String,
    stroke_rgba: [f64; 4],
}

impl CairoCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
        let ctx = Context::new(&surface)?;
        Ok(Self {
            surface,
            ctx,
            stroke_style: "#000000".into(),
            stroke_rgba: [0.0, 0.0, 0.0, 1.0],
        })
    }

    fn image_surface_from_rgba(&self, image: &dyn CanvasImageSource) -> Result<ImageSurface> {
        let width = image.width();
        let height = image.height();
        let data = image
            .data_rgba()
            .ok_or_else(|| SignatureError::Other("CanvasImageSource missing RGBA data".into()))?;

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| SignatureError::Other("image dimensions overflow".into()))?;

        if data.len() != expected {
            return Err(SignatureError::Other(
                "RGBA buffer length does not match width*height*4".into(),
            ));
        }

        let mut buf = vec![0u8; expected];
        for (i, chunk) in data.chunks_exact(4).enumerate() {
            let r = chunk[0] as u16;
            let g = chunk[1] as u16;
            let b = chunk[2] as u16;
            let a = chunk[3] as u16;
            let idx = i * 4;
            // ARgb32 is premultiplied and native-endian (BGRA on little-endian).
            buf[idx] = ((b * a + 127) / 255) as u8;
            buf[idx + 1] = ((g * a + 127) / 255) as u8;
            buf[idx + 2] = ((r * a + 127) / 255) as u8;
            buf[idx + 3] = a as u8;
        }

        let stride = (width * 4) as i32;
        let surface =
            ImageSurface::create_for_data(buf, Format::ARgb32, width as i32, height as i32, stride)?;
        Ok(surface)
    }
}

impl CanvasLineStyles for CairoCanvas {
    fn set_line_width(&mut self, value: f64) -> Result<()> {
        self.ctx.set_line_width(value);
        Ok(())
    }

    fn line_width(&self) -> Result<f64> {
        Ok(self.ctx.line_width())
    }

    fn set_line_cap(&mut self, value: LineCap) -> Result<()> {
        self.ctx.set_line_cap(match value {
            LineCap::Butt => CairoLineCap::Butt,
            LineCap::Round => CairoLineCap::Round,
            LineCap::Square => CairoLineCap::Square,
        });
        Ok(())
    }

    fn line_cap(&self) -> Result<LineCap> {
        Ok(match self.ctx.line_cap() {
            CairoLineCap::Round => LineCap::Round,
            CairoLineCap::Square => LineCap::Square,
            _ => LineCap::Butt,
        })
    }

    fn set_line_join(&mut self, value: LineJoin) -> Result<()> {
        self.ctx.set_line_join(match value {
            LineJoin::Bevel => CairoLineJoin::Bevel,
            LineJoin::Miter => CairoLineJoin::Miter,
            LineJoin::Round => CairoLineJoin::Round,
        });
        Ok(())
    }

    fn line_join(&self) -> Result<LineJoin> {
        Ok(match self.ctx.line_join() {
            CairoLineJoin::Bevel => LineJoin::Bevel,
            CairoLineJoin::Round => LineJoin::Round,
            _ => LineJoin::Miter,
        })
    }
}

impl CanvasStrokeStyles for CairoCanvas {
    /// Unparseable colors are ignored and the previous style is kept.
    fn set_stroke_style(&mut self, color: &str) -> Result<()> {
        match parse_color(color) {
            Ok(parsed) => {
                let [r, g, b, a] = parsed.to_array();
                self.stroke_rgba = [r as f64, g as f64, b as f64, a as f64];
                self.stroke_style = color.to_string();
            }
            Err(err) => tracing::debug!(%err, "stroke style ignored"),
        }
        Ok(())
    }

    fn stroke_style(&self) -> Result<String> {
        Ok(self.stroke_style.clone())
    }
}

impl CanvasRectangles for CairoCanvas {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.ctx.save()?;
        self.ctx.new_path();
        self.ctx.set_operator(Operator::Clear);
        self.ctx.rectangle(x, y, w, h);
        self.ctx.fill()?;
        self.ctx.restore()?;
        Ok(())
    }
}

impl CanvasPaths for CairoCanvas {
    fn begin_path(&mut self) -> Result<()> {
        self.ctx.new_path();
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.move_to(x, y);
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.line_to(x, y);
        Ok(())
    }

    fn stroke(&mut self) -> Result<()> {
        let [r, g, b, a] = self.stroke_rgba;
        self.ctx.set_source_rgba(r, g, b, a);
        self.ctx.stroke_preserve()?;
        Ok(())
    }
}

impl CanvasDrawImage for CairoCanvas {
    fn draw_image_scaled(
        &mut self,
        image: &dyn CanvasImageSource,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(());
        }
        let surface = self.image_surface_from_rgba(image)?;
        let pattern = SurfacePattern::create(&surface);
        pattern.set_filter(Filter::Good);
        pattern.set_extend(Extend::None);
        let scale_x = dw / image.width() as f64;
        let scale_y = dh / image.height() as f64;

        self.ctx.save()?;
        self.ctx.new_path();
        self.ctx.translate(dx, dy);
        self.ctx.scale(scale_x, scale_y);
        self.ctx.set_source(&pattern)?;
        self.ctx
            .rectangle(0.0, 0.0, image.width() as f64, image.height() as f64);
        self.ctx.clip();
        self.ctx.paint()?;
        self.ctx.restore()?;
        Ok(())
    }
}

impl CanvasExport for CairoCanvas {
    fn to_png_bytes(&self) -> Result<Vec<u8>> {
        self.surface.flush();
        let mut buf = Vec::new();
        self.surface.write_to_png(&mut buf)?;
        Ok(buf)
    }
}

impl CanvasRenderingContext2D for CairoCanvas {
    fn canvas_width(&self) -> u32 {
        self.surface.width() as u32
    }

    fn canvas_height(&self) -> u32 {
        self.surface.height() as u32
    }
}
