//! Scatter render/interaction engine.
//!
//! [`ScatterEngine`] exclusively owns the view transform, the canvas size and
//! the gesture state. Consumers push configuration in (displayed points,
//! scheme, color mode, point size) and pull [`EngineEvent`]s out via
//! [`ScatterEngine::drain_events`].

use std::time::{Duration, Instant};

use crate::data::dataset::Point;
use crate::data::derived::{Bounds, ColorMode};
use crate::data::point_color::point_color;
use crate::data::selection::ClickModifiers;

use egui::Color32;

use super::canvas::{Canvas, PixmapCanvas};
use super::gesture::{GestureEffect, GestureState, PointerInput};
use super::hit_test::{nearest_point, DEFAULT_HIT_RADIUS};
use super::transform::{CanvasSize, ScaleRange, ViewTransform};

/// Tunables for the engine. Lengths are in logical pixels unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Pick radius in device pixels.
    pub hit_radius: f64,
    /// Margin kept free around the data when fitting.
    pub fit_padding: f64,
    /// Multiplicative step per wheel notch.
    pub zoom_factor: f64,
    pub scale_range: ScaleRange,
    /// Smallest radius a point is drawn with.
    pub min_radius: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hit_radius: DEFAULT_HIT_RADIUS,
            fit_padding: 20.0,
            zoom_factor: 1.1,
            scale_range: ScaleRange::default(),
            min_radius: 0.5,
        }
    }
}

/// Per-draw configuration.
#[derive(Debug, Clone, Copy)]
pub struct RenderParams<'a> {
    pub scheme: &'a str,
    pub color_mode: ColorMode,
    pub point_size: f64,
}

/// Outcome of one draw cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStats {
    pub point_count: usize,
    pub duration: Duration,
}

impl DrawStats {
    pub fn status_text(&self) -> String {
        format!(
            "{} points · draw {:.1}ms",
            self.point_count,
            self.duration.as_secs_f64() * 1000.0
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HoverChanged(Option<usize>),
    Clicked {
        index: Option<usize>,
        modifiers: ClickModifiers,
    },
    Panned,
    Zoomed { scale: f64 },
    Fitted,
    Drawn(DrawStats),
}

pub struct ScatterEngine {
    settings: EngineSettings,
    transform: ViewTransform,
    /// Scale chosen by the last fit; zoom limits always admit it.
    fit_scale: f64,
    canvas: CanvasSize,
    pixels_per_point: f64,
    bounds: Option<Bounds>,
    gesture: GestureState,
    hover: Option<usize>,
    last_draw: Option<DrawStats>,
    events: Vec<EngineEvent>,
}

impl Default for ScatterEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl ScatterEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            transform: ViewTransform::default(),
            fit_scale: 1.0,
            canvas: CanvasSize::new(0.0, 0.0),
            pixels_per_point: 1.0,
            bounds: None,
            gesture: GestureState::Idle,
            hover: None,
            last_draw: None,
            events: Vec::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EngineSettings) {
        self.settings = settings;
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    pub fn pixels_per_point(&self) -> f64 {
        self.pixels_per_point
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn last_draw(&self) -> Option<&DrawStats> {
        self.last_draw.as_ref()
    }

    /// Status line of the last draw, empty before the first one.
    pub fn status(&self) -> String {
        self.last_draw
            .as_ref()
            .map(DrawStats::status_text)
            .unwrap_or_default()
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Auto-fit triggers ────────────────────────────────────────────────────

    /// Record a new canvas size (device pixels). Refits when it changed.
    pub fn resize(&mut self, canvas: CanvasSize, pixels_per_point: f64) -> bool {
        let ppp = if pixels_per_point > 0.0 { pixels_per_point } else { 1.0 };
        if canvas == self.canvas && ppp == self.pixels_per_point {
            return false;
        }
        self.canvas = canvas;
        self.pixels_per_point = ppp;
        self.fit();
        true
    }

    /// Record the bounds of the displayed points. Refits when they changed.
    pub fn set_bounds(&mut self, bounds: Bounds) -> bool {
        if self.bounds == Some(bounds) {
            return false;
        }
        self.bounds = Some(bounds);
        self.fit();
        true
    }

    /// Fit the stored bounds to the canvas.
    pub fn fit(&mut self) {
        let bounds = self.bounds.unwrap_or_default();
        let padding = self.settings.fit_padding * self.pixels_per_point;
        self.transform = ViewTransform::fit(&bounds, self.canvas, padding);
        self.fit_scale = self.transform.scale;
        log::debug!(
            "fit view: scale {:.3}, translate ({:.1}, {:.1})",
            self.transform.scale,
            self.transform.translate_x,
            self.transform.translate_y
        );
        self.events.push(EngineEvent::Fitted);
    }

    /// Invalidate the hover index, e.g. after the displayed set changed.
    pub fn clear_hover(&mut self) {
        if self.hover.take().is_some() {
            self.events.push(EngineEvent::HoverChanged(None));
        }
    }

    // ── Draw cycle ───────────────────────────────────────────────────────────

    pub fn point_radius(&self, point_size: f64) -> f64 {
        point_size.max(self.settings.min_radius) * self.pixels_per_point
    }

    /// Clear `canvas` and draw every point in array order.
    pub fn draw<C: Canvas>(&mut self, canvas: &mut C, points: &[&Point], params: RenderParams<'_>) -> DrawStats {
        let started = Instant::now();
        self.paint(canvas, points, params);
        let stats = DrawStats {
            point_count: points.len(),
            duration: started.elapsed(),
        };
        self.last_draw = Some(stats);
        self.events.push(EngineEvent::Drawn(stats));
        stats
    }

    /// Render the current view into an offscreen pixmap of the canvas size.
    /// Leaves engine state and pending events untouched.
    pub fn render_offscreen(
        &self,
        points: &[&Point],
        params: RenderParams<'_>,
        background: Color32,
    ) -> Option<PixmapCanvas> {
        let width = self.canvas.width.round().max(0.0) as u32;
        let height = self.canvas.height.round().max(0.0) as u32;
        let mut canvas = PixmapCanvas::new(width, height, background)?;
        self.paint(&mut canvas, points, params);
        Some(canvas)
    }

    fn paint<C: Canvas>(&self, canvas: &mut C, points: &[&Point], params: RenderParams<'_>) {
        let size = canvas.size();
        let radius = self.point_radius(params.point_size);
        canvas.clear();
        for p in points {
            let center = self.transform.world_to_screen(p.x, p.y, size);
            let color = point_color(p, params.scheme, params.color_mode);
            canvas.fill_circle(center, radius, color);
        }
    }

    // ── Interaction ──────────────────────────────────────────────────────────

    pub fn hit_test(&self, points: &[&Point], cursor: (f64, f64)) -> Option<usize> {
        nearest_point(
            points.iter().copied(),
            &self.transform,
            self.canvas,
            cursor,
            self.settings.hit_radius,
        )
    }

    /// Feed one pointer input (device pixels).
    pub fn pointer(&mut self, input: PointerInput, points: &[&Point]) {
        let (next, effect) = self.gesture.step(input);
        self.gesture = next;
        match effect {
            GestureEffect::None => {}
            GestureEffect::Pan { dx, dy } => {
                self.transform.pan(dx, dy);
                self.events.push(EngineEvent::Panned);
            }
            GestureEffect::Hover { x, y } => {
                let hit = self.hit_test(points, (x, y));
                #[cfg(feature = "hover_debug")]
                log::trace!("hover probe ({:.1}, {:.1}) -> {:?}", x, y, hit);
                if hit != self.hover {
                    self.hover = hit;
                    self.events.push(EngineEvent::HoverChanged(hit));
                }
            }
            GestureEffect::HoverLost => self.clear_hover(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// One wheel notch at `cursor` (device pixels).
    pub fn wheel(&mut self, cursor: (f64, f64), zoom_in: bool) {
        let factor = if zoom_in {
            self.settings.zoom_factor
        } else {
            1.0 / self.settings.zoom_factor
        };
        let range = self.settings.scale_range.including(self.fit_scale);
        self.transform.zoom_at(cursor, factor, self.canvas, range);
        self.events.push(EngineEvent::Zoomed {
            scale: self.transform.scale,
        });
    }

    /// Hit-test at the click position and report the result.
    pub fn click(&mut self, cursor: (f64, f64), modifiers: ClickModifiers, points: &[&Point]) -> Option<usize> {
        let index = self.hit_test(points, cursor);
        self.events.push(EngineEvent::Clicked { index, modifiers });
        index
    }
}
