//! Drawing surface abstraction used by the draw cycle.
//!
//! The on-screen widget implements [`Canvas`] over an egui painter; the
//! offscreen [`PixmapCanvas`] renders with tiny-skia for PNG export and tests.

use std::path::Path;

use egui::Color32;

use super::transform::CanvasSize;
use crate::error::ExportError;

/// Minimal 2D surface addressed in device pixels.
pub trait Canvas {
    fn size(&self) -> CanvasSize;
    fn clear(&mut self);
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color32);
}

/// Offscreen RGBA surface.
pub struct PixmapCanvas {
    pixmap: tiny_skia::Pixmap,
    background: Color32,
}

impl PixmapCanvas {
    /// `None` when either dimension is zero.
    pub fn new(width: u32, height: u32, background: Color32) -> Option<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height)?;
        let mut canvas = Self { pixmap, background };
        canvas.clear();
        Some(canvas)
    }

    /// Color of one pixel, for inspection.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color32::from_rgba_unmultiplied(p.red(), p.green(), p.blue(), p.alpha()))
    }

    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image::RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        let img = self.to_rgba_image().ok_or(ExportError::EmptyCanvas)?;
        img.save(path)?;
        Ok(())
    }
}

fn skia_color(c: Color32) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r(), c.g(), c.b(), c.a())
}

impl Canvas for PixmapCanvas {
    fn size(&self) -> CanvasSize {
        CanvasSize::new(f64::from(self.pixmap.width()), f64::from(self.pixmap.height()))
    }

    fn clear(&mut self) {
        self.pixmap.fill(skia_color(self.background));
    }

    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color32) {
        let Some(path) =
            tiny_skia::PathBuilder::from_circle(center.0 as f32, center.1 as f32, radius as f32)
        else {
            return;
        };
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }
}
