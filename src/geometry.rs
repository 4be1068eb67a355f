//! Pointer input, client-to-canvas coordinate mapping and aspect-preserving
//! image placement.

/// A position in canvas-internal (backing-store) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen bounding rectangle in CSS pixels. Mirrors DOMRect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Inclusive on every edge, matching how a dialog decides a click landed inside it.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

/// Pointer and touch events the pad reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    MouseDown { client_x: f64, client_y: f64 },
    MouseMove { client_x: f64, client_y: f64 },
    MouseUp,
    MouseOut,
    TouchStart { touches: Vec<TouchPoint> },
    TouchMove { touches: Vec<TouchPoint> },
    TouchEnd,
}

impl InputEvent {
    /// Client position of the mouse, or of the first active touch.
    pub fn client_position(&self) -> Option<(f64, f64)> {
        match self {
            InputEvent::MouseDown { client_x, client_y }
            | InputEvent::MouseMove { client_x, client_y } => Some((*client_x, *client_y)),
            InputEvent::TouchStart { touches } | InputEvent::TouchMove { touches } => {
                touches.first().map(|t| (t.client_x, t.client_y))
            }
            InputEvent::MouseUp | InputEvent::MouseOut | InputEvent::TouchEnd => None,
        }
    }
}

/// Rescales a client position into backing-store pixels.
///
/// The scale on each axis is internal size over displayed size. A collapsed
/// rectangle (zero or negative extent) maps that axis 1:1.
pub fn map_to_canvas(
    client: (f64, f64),
    rect: ClientRect,
    internal_width: u32,
    internal_height: u32,
) -> Point {
    let scale = |internal: u32, displayed: f64| {
        if displayed > 0.0 {
            internal as f64 / displayed
        } else {
            1.0
        }
    };
    let scale_x = scale(internal_width, rect.width);
    let scale_y = scale(internal_height, rect.height);

    Point {
        x: (client.0 - rect.left) * scale_x,
        y: (client.1 - rect.top) * scale_y,
    }
}

/// Destination rectangle for drawing an image inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Letterbox or pillarbox `image` into `canvas`, preserving the image's
/// aspect ratio and centering it on the slack axis.
pub fn fit_image(
    canvas_width: u32,
    canvas_height: u32,
    image_width: u32,
    image_height: u32,
) -> Option<Placement> {
    if canvas_width == 0 || canvas_height == 0 || image_width == 0 || image_height == 0 {
        return None;
    }

    let cw = canvas_width as f64;
    let ch = canvas_height as f64;
    let canvas_ratio = cw / ch;
    let image_ratio = image_width as f64 / image_height as f64;

    let placement = if image_ratio > canvas_ratio {
        let height = cw / image_ratio;
        Placement {
            x: 0.0,
            y: (ch - height) / 2.0,
            width: cw,
            height,
        }
    } else {
        let width = ch * image_ratio;
        Placement {
            x: (cw - width) / 2.0,
            y: 0.0,
            width,
            height: ch,
        }
    };
    Some(placement)
}
