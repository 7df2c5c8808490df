//! World ↔ screen mapping for the scatter canvas.
//!
//! ```text
//! screen_x = width/2  + (world_x * scale + translate_x)
//! screen_y = height/2 - (world_y * scale + translate_y)
//! ```
//!
//! Screen Y grows downward while world Y grows upward. All screen values are
//! in device pixels.

use crate::data::derived::Bounds;

/// Smallest world span used when fitting, so single points and collinear
/// data do not divide by zero.
pub const MIN_SPAN: f64 = 1e-6;

/// Canvas size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Allowed range for [`ViewTransform::scale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 1000.0,
        }
    }
}

impl ScaleRange {
    pub fn clamp(&self, s: f64) -> f64 {
        s.clamp(self.min, self.max)
    }

    /// Widen the range so that `s` lies inside it.
    pub fn including(&self, s: f64) -> Self {
        Self {
            min: self.min.min(s),
            max: self.max.max(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn world_to_screen(&self, x: f64, y: f64, canvas: CanvasSize) -> (f64, f64) {
        let (cx, cy) = canvas.center();
        (
            cx + (x * self.scale + self.translate_x),
            cy - (y * self.scale + self.translate_y),
        )
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64, canvas: CanvasSize) -> (f64, f64) {
        let (cx, cy) = canvas.center();
        (
            ((sx - cx) - self.translate_x) / self.scale,
            -(((sy - cy) + self.translate_y) / self.scale),
        )
    }

    /// Uniform scale that fits `bounds` into the canvas minus `padding` on
    /// every side, with the bounds' centroid on the canvas center. The result
    /// is not limited to any [`ScaleRange`].
    pub fn fit(bounds: &Bounds, canvas: CanvasSize, padding: f64) -> Self {
        let span_x = bounds.span_x().max(MIN_SPAN);
        let span_y = bounds.span_y().max(MIN_SPAN);
        let avail_x = (canvas.width - 2.0 * padding).max(1.0);
        let avail_y = (canvas.height - 2.0 * padding).max(1.0);
        let scale = (avail_x / span_x).min(avail_y / span_y);
        let (cx, cy) = bounds.centroid();
        Self {
            scale,
            translate_x: -cx * scale,
            translate_y: -cy * scale,
        }
    }

    /// Move the view by a screen-space delta (device pixels, Y down).
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y -= dy;
    }

    /// Multiply the scale by `factor` (clamped to `range`) while keeping the
    /// world point under `cursor` at the same screen position.
    pub fn zoom_at(&mut self, cursor: (f64, f64), factor: f64, canvas: CanvasSize, range: ScaleRange) {
        let (wx, wy) = self.screen_to_world(cursor.0, cursor.1, canvas);
        let new_scale = range.clamp(self.scale * factor);
        let ds = new_scale - self.scale;
        self.translate_x -= wx * ds;
        self.translate_y -= wy * ds;
        self.scale = new_scale;
    }

    /// World-space rectangle currently visible on the canvas.
    pub fn visible_bounds(&self, canvas: CanvasSize) -> Bounds {
        let (x0, y0) = self.screen_to_world(0.0, canvas.height, canvas);
        let (x1, y1) = self.screen_to_world(canvas.width, 0.0, canvas);
        Bounds {
            min_x: x0,
            max_x: x1,
            min_y: y0,
            max_y: y1,
        }
    }
}
