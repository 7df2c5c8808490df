//! Central scatter widget: feeds egui input to the [`ScatterEngine`] and
//! paints its draw cycle through an egui painter.

use egui::{Color32, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::color_scheme::ColorScheme;
use crate::data::selection::ClickModifiers;
use crate::explorer::ExplorerState;
use crate::view::canvas::Canvas;
use crate::view::engine::{EngineEvent, EngineSettings, RenderParams, ScatterEngine};
use crate::view::gesture::PointerInput;
use crate::view::transform::CanvasSize;

/// [`Canvas`] over an egui painter. Engine coordinates are device pixels
/// relative to the widget's top-left corner.
pub struct PainterCanvas<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
    pixels_per_point: f32,
    background: Color32,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, rect: Rect, pixels_per_point: f32, background: Color32) -> Self {
        Self {
            painter,
            rect,
            pixels_per_point: pixels_per_point.max(f32::EPSILON),
            background,
        }
    }

    fn to_ui(&self, (x, y): (f64, f64)) -> Pos2 {
        self.rect.min + Vec2::new(x as f32, y as f32) / self.pixels_per_point
    }
}

impl Canvas for PainterCanvas<'_> {
    fn size(&self) -> CanvasSize {
        CanvasSize::new(
            f64::from(self.rect.width() * self.pixels_per_point),
            f64::from(self.rect.height() * self.pixels_per_point),
        )
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 0.0, self.background);
    }

    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color32) {
        let r = radius as f32 / self.pixels_per_point;
        self.painter.circle_filled(self.to_ui(center), r, color);
    }
}

/// Widget-side options for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ScatterStyle {
    pub theme: ColorScheme,
    /// Hover and selection rings.
    pub highlights: bool,
}

pub struct ScatterView {
    engine: ScatterEngine,
    seen_revision: Option<u64>,
    rect: Rect,
}

impl Default for ScatterView {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl ScatterView {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            engine: ScatterEngine::new(settings),
            seen_revision: None,
            rect: Rect::NOTHING,
        }
    }

    pub fn engine(&self) -> &ScatterEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ScatterEngine {
        &mut self.engine
    }

    /// Screen rect of the canvas in the last frame (logical points).
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Allocate the remaining space, run input and draw. Returns the engine
    /// events raised during this frame.
    pub fn show(&mut self, ui: &mut Ui, explorer: &mut ExplorerState, style: ScatterStyle) -> Vec<EngineEvent> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.rect = rect;
        let ppp = ui.ctx().pixels_per_point();
        let to_device = |p: Pos2| -> (f64, f64) {
            let v = (p - rect.min) * ppp;
            (f64::from(v.x), f64::from(v.y))
        };

        let canvas_size = CanvasSize::new(
            f64::from(rect.width() * ppp),
            f64::from(rect.height() * ppp),
        );
        self.engine.resize(canvas_size, f64::from(ppp));

        if self.seen_revision != Some(explorer.displayed_revision()) {
            self.seen_revision = Some(explorer.displayed_revision());
            self.engine.clear_hover();
        }
        self.engine.set_bounds(explorer.bounds());

        {
            let points = explorer.displayed_points();
            let (hover_pos, modifiers, scroll_y, moved) = ui.input(|i| {
                (
                    i.pointer.hover_pos(),
                    i.modifiers,
                    i.raw_scroll_delta.y,
                    i.pointer.delta() != Vec2::ZERO,
                )
            });

            if response.drag_started_by(egui::PointerButton::Primary) {
                if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                    let (x, y) = to_device(origin);
                    self.engine.pointer(PointerInput::Down { x, y }, &points);
                }
            }
            if self.engine.is_dragging() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = to_device(pos);
                    self.engine.pointer(PointerInput::Move { x, y }, &points);
                }
                if response.drag_stopped() || !response.dragged() {
                    self.engine.pointer(PointerInput::Up, &points);
                }
            } else if response.hovered() {
                if let Some(pos) = hover_pos.filter(|p| rect.contains(*p)) {
                    if moved || self.engine.hover().is_none() {
                        let (x, y) = to_device(pos);
                        self.engine.pointer(PointerInput::Move { x, y }, &points);
                    }
                }
            } else if self.engine.hover().is_some() {
                self.engine.pointer(PointerInput::Leave, &points);
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.engine
                        .click(to_device(pos), ClickModifiers::from_egui(&modifiers), &points);
                }
            }

            if response.hovered() && scroll_y != 0.0 {
                if let Some(pos) = hover_pos {
                    self.engine.wheel(to_device(pos), scroll_y > 0.0);
                }
            }
        }
        explorer.set_hover(self.engine.hover());

        let painter = ui.painter_at(rect);
        let points = explorer.displayed_points();
        let mut canvas = PainterCanvas::new(&painter, rect, ppp, style.theme.canvas_background());
        self.engine.draw(
            &mut canvas,
            &points,
            RenderParams {
                scheme: explorer.scheme(),
                color_mode: explorer.color_mode(),
                point_size: explorer.point_size(),
            },
        );

        if style.highlights {
            let radius = self.engine.point_radius(explorer.point_size()) as f32 / ppp;
            let transform = *self.engine.transform();
            let size = self.engine.canvas_size();
            for (i, p) in points.iter().enumerate() {
                if explorer.is_selected(i) {
                    let c = canvas.to_ui(transform.world_to_screen(p.x, p.y, size));
                    painter.circle_stroke(c, radius + 2.0, Stroke::new(1.5, style.theme.selection_stroke()));
                }
            }
            if let Some(p) = explorer.hover().and_then(|h| points.get(h)) {
                let c = canvas.to_ui(transform.world_to_screen(p.x, p.y, size));
                painter.circle_stroke(c, radius + 3.0, Stroke::new(1.5, style.theme.hover_stroke()));
            }
        }

        if let Some(p) = explorer.hovered_point() {
            let category = p
                .prediction()
                .and_then(|pr| pr.category.clone())
                .unwrap_or_default();
            let score = p.score().map_or("n/a".to_string(), |s| format!("{:.3}", s));
            let label = p
                .label(explorer.scheme())
                .map_or("(none)".to_string(), ToString::to_string);
            let text = format!("#{} {}\nscore {} · {} = {}", p.id, category, score, explorer.scheme(), label);
            response.on_hover_text_at_pointer(text);
        }

        self.engine.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painter_canvas_reports_device_size() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(100.0, 50.0));
        let painter = egui::Painter::new(ctx, egui::LayerId::background(), rect);
        let canvas = PainterCanvas::new(&painter, rect, 2.0, Color32::BLACK);
        assert_eq!(canvas.size(), CanvasSize::new(200.0, 100.0));
        assert_eq!(canvas.to_ui((20.0, 10.0)), Pos2::new(20.0, 25.0));
    }
}
