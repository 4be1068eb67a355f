//! The signature drawing session.
//!
//! `SignaturePad` owns the stroke history and drives a canvas backend. All
//! mutation happens through `&mut self` on the caller's event thread, so the
//! history needs no synchronization. The canvas is optional: until it is
//! mounted every operation that would touch pixels is skipped, but history
//! bookkeeping still applies.

use std::path::Path;

use tracing::{debug, trace};

use crate::api::{CanvasExport, CanvasImageSource, CanvasRenderingContext2D};
use crate::config::SignatureConfig;
use crate::error::Result;
use crate::geometry::{ClientRect, InputEvent, Point, fit_image, map_to_canvas};
use crate::stroke::{Stroke, StrokeHistory};
use crate::theme::ThemeMode;
use crate::upload;

#[derive(Clone, Debug, Default, PartialEq)]
enum Session {
    #[default]
    Idle,
    Drawing {
        last: Point,
        points: Vec<Point>,
    },
}

pub struct SignaturePad<C> {
    canvas: Option<C>,
    config: SignatureConfig,
    layout: ClientRect,
    stroke_color: String,
    history: StrokeHistory,
    session: Session,
    empty: bool,
    image_attached: bool,
    finalized: bool,
}

impl<C: CanvasRenderingContext2D> SignaturePad<C> {
    /// Builds an unmounted pad. The default layout places the canvas at the
    /// origin at its nominal size.
    pub fn new(config: SignatureConfig) -> Self {
        let layout = ClientRect::new(0.0, 0.0, config.width as f64, config.height as f64);
        let stroke_color = config.stroke_color().to_string();
        Self {
            canvas: None,
            config,
            layout,
            stroke_color,
            history: StrokeHistory::new(),
            session: Session::Idle,
            empty: true,
            image_attached: false,
            finalized: false,
        }
    }

    /// Attaches a canvas and configures its line styles and ink color.
    pub fn mount(&mut self, mut canvas: C) -> Result<()> {
        canvas.set_stroke_style(&self.stroke_color)?;
        canvas.set_line_width(self.config.line_width)?;
        canvas.set_line_cap(self.config.line_cap)?;
        canvas.set_line_join(self.config.line_join)?;
        debug!(
            width = canvas.canvas_width(),
            height = canvas.canvas_height(),
            "mounted signature canvas"
        );
        self.canvas = Some(canvas);
        Ok(())
    }

    /// Detaches the canvas, abandoning any stroke in progress.
    pub fn unmount(&mut self) -> Option<C> {
        self.session = Session::Idle;
        self.canvas.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    pub fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Updates the on-screen rectangle used to map client coordinates.
    pub fn set_layout(&mut self, rect: ClientRect) {
        self.layout = rect;
    }

    pub fn layout(&self) -> ClientRect {
        self.layout
    }

    /// Maps a client-space position into backing-store pixels. Without a
    /// mounted canvas this is the origin.
    pub fn map_client_point(&self, client_x: f64, client_y: f64) -> Point {
        match &self.canvas {
            Some(canvas) => map_to_canvas(
                (client_x, client_y),
                self.layout,
                canvas.canvas_width(),
                canvas.canvas_height(),
            ),
            None => Point::ORIGIN,
        }
    }

    /// Routes a pointer or touch event. Returns true when the event changed
    /// the session.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<bool> {
        match event {
            InputEvent::MouseDown { .. } | InputEvent::TouchStart { .. } => {
                match event.client_position() {
                    Some((x, y)) => Ok(self.begin_stroke(self.map_client_point(x, y))),
                    None => Ok(false),
                }
            }
            InputEvent::MouseMove { .. } | InputEvent::TouchMove { .. } => {
                match event.client_position() {
                    Some((x, y)) => self.extend_stroke(self.map_client_point(x, y)),
                    None => Ok(false),
                }
            }
            InputEvent::MouseUp | InputEvent::MouseOut | InputEvent::TouchEnd => {
                Ok(self.end_stroke())
            }
        }
    }

    /// `Idle -> Drawing`. Refused while drawing is locked.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if !self.is_drawing_enabled() {
            trace!("pointer down ignored, drawing is locked");
            return false;
        }
        trace!(x = point.x, y = point.y, "stroke started");
        self.session = Session::Drawing {
            last: point,
            points: vec![point],
        };
        true
    }

    /// Extends the stroke in progress, inking the new segment immediately.
    pub fn extend_stroke(&mut self, point: Point) -> Result<bool> {
        let Session::Drawing { last, points } = &mut self.session else {
            return Ok(false);
        };
        let from = *last;
        *last = point;
        points.push(point);

        if let Some(canvas) = self.canvas.as_mut() {
            Self::ink_segment(canvas, from, point)?;
            self.empty = false;
        }
        trace!(x = point.x, y = point.y, "stroke extended");
        Ok(true)
    }

    /// `Drawing -> Idle`. A gesture that never moved leaves no history entry.
    pub fn end_stroke(&mut self) -> bool {
        let Session::Drawing { points, .. } = std::mem::take(&mut self.session) else {
            return false;
        };
        if points.len() < 2 {
            trace!("tap without movement discarded");
            return false;
        }
        debug!(points = points.len(), color = %self.stroke_color, "stroke recorded");
        self.history
            .push(Stroke::new(points, self.stroke_color.clone()));
        true
    }

    fn ink_segment(canvas: &mut C, from: Point, to: Point) -> Result<()> {
        canvas.begin_path()?;
        canvas.move_to(from.x, from.y)?;
        canvas.line_to(to.x, to.y)?;
        canvas.stroke()
    }

    /// Drops the last stroke and rebuilds the canvas from what remains.
    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        if self.history.pop().is_none() {
            return Ok(false);
        }
        self.session = Session::Idle;
        self.redraw()?;
        self.empty = self.history.is_empty();
        debug!(remaining = self.history.len(), "undid last stroke");
        Ok(true)
    }

    /// Clears the canvas and replays every stroke in historical order.
    pub fn redraw(&mut self) -> Result<()> {
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(());
        };
        let (w, h) = (canvas.canvas_width() as f64, canvas.canvas_height() as f64);
        canvas.clear_rect(0.0, 0.0, w, h)?;

        // Same call sequence as live drawing, so caps, joins and translucent
        // overlaps come out identical.
        for stroke in self.history.iter().filter(|s| s.is_drawable()) {
            canvas.set_stroke_style(stroke.color())?;
            for pair in stroke.points().windows(2) {
                Self::ink_segment(canvas, pair[0], pair[1])?;
            }
        }
        canvas.set_stroke_style(&self.stroke_color)?;
        trace!(points = self.history.point_count(), "replayed history");
        Ok(())
    }

    /// Wipes everything: pixels, history, the stroke in progress and any
    /// attached image.
    pub fn clear(&mut self) -> Result<()> {
        self.history.clear();
        self.session = Session::Idle;
        self.empty = true;
        self.image_attached = false;
        if let Some(canvas) = self.canvas.as_mut() {
            let (w, h) = (canvas.canvas_width() as f64, canvas.canvas_height() as f64);
            canvas.clear_rect(0.0, 0.0, w, h)?;
        }
        debug!("signature cleared");
        Ok(())
    }

    /// Replaces the drawing with `image`, fitted inside the canvas. Skipped
    /// (returns false) when no canvas is mounted or the image has no area.
    pub fn attach_image(&mut self, image: &dyn CanvasImageSource) -> Result<bool> {
        let Some(canvas) = self.canvas.as_mut() else {
            debug!("image attach skipped, canvas not mounted");
            return Ok(false);
        };
        let (cw, ch) = (canvas.canvas_width(), canvas.canvas_height());
        let Some(placement) = fit_image(cw, ch, image.width(), image.height()) else {
            debug!("image attach skipped, nothing to draw");
            return Ok(false);
        };

        canvas.clear_rect(0.0, 0.0, cw as f64, ch as f64)?;
        canvas.draw_image_scaled(
            image,
            placement.x,
            placement.y,
            placement.width,
            placement.height,
        )?;

        self.history.clear();
        self.session = Session::Idle;
        self.image_attached = true;
        self.empty = false;
        debug!(
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            "image attached"
        );
        Ok(true)
    }

    /// Decodes `bytes` and attaches the result.
    pub fn attach_image_bytes(&mut self, bytes: &[u8]) -> Result<bool> {
        if !self.is_mounted() {
            return Ok(false);
        }
        let image = upload::decode_image(bytes)?;
        self.attach_image(&image)
    }

    /// Attaches an image carried in a `data:` URL.
    pub fn attach_image_data_url(&mut self, url: &str) -> Result<bool> {
        if !self.is_mounted() {
            return Ok(false);
        }
        let image = upload::decode_data_url(url)?;
        self.attach_image(&image)
    }

    /// Reads, decodes and attaches an image file.
    pub async fn attach_image_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        if !self.is_mounted() {
            return Ok(false);
        }
        let image = upload::load_image_file(path).await?;
        self.attach_image(&image)
    }

    /// Sets the ink for future strokes. Strokes already in history keep
    /// their recorded color.
    pub fn set_stroke_color(&mut self, color: impl Into<String>) -> Result<()> {
        self.stroke_color = color.into();
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.set_stroke_style(&self.stroke_color)?;
        }
        Ok(())
    }

    /// Switches to the palette color for `mode`.
    pub fn set_theme(&mut self, mode: ThemeMode) -> Result<()> {
        self.config.theme = mode;
        let color = self.config.palette.color_for(mode).to_string();
        self.set_stroke_color(color)
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    /// Locks drawing once a signature has been accepted.
    pub fn finalize(&mut self) {
        self.session = Session::Idle;
        self.finalized = true;
    }

    pub fn reopen(&mut self) {
        self.finalized = false;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.session, Session::Drawing { .. })
    }

    pub fn has_image(&self) -> bool {
        self.image_attached
    }

    pub fn is_drawing_enabled(&self) -> bool {
        !self.image_attached && !self.finalized
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    /// Points of the stroke in progress, if any.
    pub fn pending_points(&self) -> &[Point] {
        match &self.session {
            Session::Drawing { points, .. } => points,
            Session::Idle => &[],
        }
    }
}

impl<C: CanvasRenderingContext2D + CanvasExport> SignaturePad<C> {
    /// PNG data URL of the signature, or `None` when there is nothing to export.
    pub fn export_signature(&self) -> Result<Option<String>> {
        match &self.canvas {
            Some(canvas) if !self.empty => Ok(Some(canvas.to_data_url()?)),
            _ => Ok(None),
        }
    }
}
