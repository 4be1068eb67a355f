use crate::api::*;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPath {
    pub commands: Vec<PathCommand>,
}

impl RecordedPath {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// The vertices of the path, in order, ignoring which command produced them.
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        self.commands
            .iter()
            .map(|cmd| match cmd {
                PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => (*x, *y),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub stroke_style: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    StrokePath {
        path: RecordedPath,
        state: Snapshot,
    },
    DrawImageScaled {
        source_width: u32,
        source_height: u32,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    },
    ClearRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
}

#[derive(Clone, Debug)]
struct RecorderState {
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    stroke_style: String,
}

impl Default for RecorderState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            stroke_style: "#000000".to_string(),
        }
    }
}

/// Canvas that keeps every draw call instead of producing pixels.
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    state: RecorderState,
    current_path: Vec<PathCommand>,
    current_point: Option<(f64, f64)>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            state: RecorderState::default(),
            current_path: Vec::new(),
            current_point: None,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Ops recorded after the most recent clear covering the whole canvas.
    /// Partial clears are kept in the returned slice.
    pub fn ops_since_clear(&self) -> &[DrawOp] {
        let (cw, ch) = (self.width as f64, self.height as f64);
        let start = self
            .ops
            .iter()
            .rposition(|op| match *op {
                DrawOp::ClearRect { x, y, w, h } => {
                    x.min(x + w) <= 0.0
                        && y.min(y + h) <= 0.0
                        && x.max(x + w) >= cw
                        && y.max(y + h) >= ch
                }
                _ => false,
            })
            .map_or(0, |i| i + 1);
        &self.ops[start..]
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            line_width: self.state.line_width,
            line_cap: self.state.line_cap,
            line_join: self.state.line_join,
            stroke_style: self.state.stroke_style.clone(),
        }
    }

    fn ensure_subpath(&mut self) -> Result<()> {
        if self.current_point.is_none() {
            self.move_to(0.0, 0.0)?;
        }
        Ok(())
    }

    fn consume_path(&mut self) -> RecordedPath {
        let path = RecordedPath::new(self.current_path.clone());
        self.current_path.clear();
        self.current_point = None;
        path
    }

    fn record_op(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

impl CanvasLineStyles for RecordingCanvas {
    fn set_line_width(&mut self, value: f64) -> Result<()> {
        self.state.line_width = value;
        Ok(())
    }

    fn line_width(&self) -> Result<f64> {
        Ok(self.state.line_width)
    }

    fn set_line_cap(&mut self, value: LineCap) -> Result<()> {
        self.state.line_cap = value;
        Ok(())
    }

    fn line_cap(&self) -> Result<LineCap> {
        Ok(self.state.line_cap)
    }

    fn set_line_join(&mut self, value: LineJoin) -> Result<()> {
        self.state.line_join = value;
        Ok(())
    }

    fn line_join(&self) -> Result<LineJoin> {
        Ok(self.state.line_join)
    }
}

impl CanvasStrokeStyles for RecordingCanvas {
    fn set_stroke_style(&mut self, color: &str) -> Result<()> {
        self.state.stroke_style = color.to_string();
        Ok(())
    }

    fn stroke_style(&self) -> Result<String> {
        Ok(self.state.stroke_style.clone())
    }
}

impl CanvasRectangles for RecordingCanvas {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.record_op(DrawOp::ClearRect { x, y, w, h });
        Ok(())
    }
}

impl CanvasPaths for RecordingCanvas {
    fn begin_path(&mut self) -> Result<()> {
        self.current_path.clear();
        self.current_point = None;
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.current_path.push(PathCommand::MoveTo { x, y });
        self.current_point = Some((x, y));
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.ensure_subpath()?;
        self.current_path.push(PathCommand::LineTo { x, y });
        self.current_point = Some((x, y));
        Ok(())
    }

    fn stroke(&mut self) -> Result<()> {
        let state = self.snapshot();
        let path = self.consume_path();
        self.record_op(DrawOp::StrokePath { path, state });
        Ok(())
    }
}

impl CanvasDrawImage for RecordingCanvas {
    fn draw_image_scaled(
        &mut self,
        image: &dyn CanvasImageSource,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()> {
        let op = DrawOp::DrawImageScaled {
            source_width: image.width(),
            source_height: image.height(),
            dx,
            dy,
            dw,
            dh,
        };
        self.record_op(op);
        Ok(())
    }
}

impl CanvasRenderingContext2D for RecordingCanvas {
    fn canvas_width(&self) -> u32 {
        self.width
    }

    fn canvas_height(&self) -> u32 {
        self.height
    }
}
