//! Detail panel listing every selected item, most recent first in selection
//! order, with its image and box overlays.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use egui::{Color32, Rect, Stroke, Ui, Vec2};
use egui_phosphor::regular::IMAGES;

use super::panel_trait::{Panel, PanelState, UiAction};
use crate::data::boxes::{caption_anchor, overlay_boxes, to_widget_rect, OverlayBox};
use crate::data::dataset::{Dataset, Point};
use crate::explorer::ExplorerState;
use crate::hotkeys::HotkeyAction;

const CAPTION_HEIGHT: f32 = 16.0;

enum ImageSlot {
    Loaded {
        texture: egui::TextureHandle,
        size: Vec2,
    },
    Unavailable(String),
}

pub struct DetailPanel {
    state: PanelState,
    /// Relative image paths resolve against this directory.
    pub base_dir: Option<PathBuf>,
    images: HashMap<PathBuf, ImageSlot>,
}

impl Default for DetailPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Details", Some(IMAGES)),
            base_dir: None,
            images: HashMap::new(),
        }
    }
}

/// Local file an item's image is read from. Remote URLs are not fetched.
pub fn resolve_image_path(image_path: Option<&str>, base_dir: Option<&Path>) -> Option<PathBuf> {
    let raw = image_path?.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return None;
    }
    let raw = raw.strip_prefix("file://").unwrap_or(raw);
    let path = PathBuf::from(raw);
    match base_dir {
        Some(base) if path.is_relative() => Some(base.join(path)),
        _ => Some(path),
    }
}

/// `"0.912"` or `"n/a"`.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.3}", s),
        None => "n/a".to_string(),
    }
}

fn load_texture(ctx: &egui::Context, path: &Path) -> ImageSlot {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            let texture = ctx.load_texture(
                path.display().to_string(),
                color,
                egui::TextureOptions::LINEAR,
            );
            ImageSlot::Loaded {
                texture,
                size: Vec2::new(size[0] as f32, size[1] as f32),
            }
        }
        Err(e) => {
            log::warn!("cannot load image {:?}: {}", path, e);
            ImageSlot::Unavailable(e.to_string())
        }
    }
}

impl DetailPanel {
    /// Drop cached textures, e.g. after a new dataset was loaded.
    pub fn clear_cache(&mut self) {
        self.images.clear();
    }

    fn image_with_boxes(&mut self, ui: &mut Ui, dataset: &Dataset, point: &Point) {
        let Some(path) = resolve_image_path(
            point.metadata.image_path.as_deref(),
            self.base_dir.as_deref(),
        ) else {
            return;
        };
        let ctx = ui.ctx().clone();
        let slot = self
            .images
            .entry(path.clone())
            .or_insert_with(|| load_texture(&ctx, &path));

        match slot {
            ImageSlot::Loaded { texture, size } => {
                let width = ui.available_width().max(1.0);
                let shown_size = Vec2::new(width, width * size.y / size.x.max(1.0));
                let resp = ui.add(egui::Image::new((texture.id(), shown_size)));
                paint_boxes(ui, resp.rect, *size, &overlay_boxes(dataset, point));
            }
            ImageSlot::Unavailable(reason) => {
                ui.weak(format!("image unavailable: {}", reason));
            }
        }
    }

    fn item(&mut self, ui: &mut Ui, explorer: &ExplorerState, dataset: &Dataset, point: &Point) {
        let pred = point.prediction();
        let category = pred.and_then(|p| p.category.as_deref()).unwrap_or("");
        ui.strong(format!(
            "#{} / {} · score {}",
            point.id,
            category,
            format_score(point.score())
        ));

        self.image_with_boxes(ui, dataset, point);

        let meta = &point.metadata;
        let scheme = explorer.scheme();
        let label = point
            .label(scheme)
            .map(ToString::to_string)
            .unwrap_or_else(|| "(none)".to_string());
        let bbox = pred
            .and_then(|p| p.bbox.as_ref())
            .map(ToString::to_string)
            .unwrap_or_else(|| "[]".to_string());

        egui::Grid::new(("detail_fields", point.id))
            .num_columns(2)
            .show(ui, |ui| {
                let mut row = |k: &str, v: String| {
                    ui.strong(k);
                    ui.label(v);
                    ui.end_row();
                };
                row("image", meta.image_name.clone().unwrap_or_default());
                row("path", meta.image_path.clone().unwrap_or_default());
                row("cluster", format!("{} = {}", scheme, label));
                row("bbox", bbox);
                row(
                    "eval",
                    format!("{} / {}", point.feature_str("eval_type").unwrap_or(""), category),
                );
            });

        let image_id = meta.image_id.as_deref().unwrap_or("");
        ui.label(egui::RichText::new(format!("Annotations for image_id {}", image_id)).strong());
        let anns = dataset.annotations_for(point);
        if anns.is_empty() {
            ui.weak("No annotations.");
        }
        for ann in anns {
            let id = ann.id.map(|i| i.to_string()).unwrap_or_default();
            let bbox = ann
                .bbox
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "[]".to_string());
            ui.label(format!(
                "#{} {} [{}]",
                id,
                ann.category.as_deref().unwrap_or(""),
                bbox.trim_start_matches('[').trim_end_matches(']')
            ));
        }
    }
}

fn paint_boxes(ui: &Ui, image: Rect, natural: Vec2, boxes: &[OverlayBox]) {
    let painter = ui.painter_at(image);
    let font = egui::FontId::proportional(11.0);
    for b in boxes {
        let Some(rect) = to_widget_rect(&b.bbox, natural, image) else {
            continue;
        };
        let color = b.kind.stroke_color();
        painter.rect_stroke(
            rect,
            2.0,
            Stroke::new(1.0, Color32::from_black_alpha(150)),
            egui::StrokeKind::Inside,
        );
        painter.rect_stroke(rect, 2.0, Stroke::new(2.0, color), egui::StrokeKind::Outside);

        let (anchor, inside) = caption_anchor(rect, image, CAPTION_HEIGHT);
        let galley = painter.layout_no_wrap(b.caption(), font.clone(), Color32::WHITE);
        let bg = Rect::from_min_size(anchor, galley.size() + Vec2::new(12.0, 4.0));
        let fill = if inside {
            Color32::from_black_alpha(153)
        } else {
            color
        };
        painter.rect_filled(bg, 4.0, fill);
        painter.galley(anchor + Vec2::new(6.0, 2.0), galley, Color32::WHITE);
    }
}

impl Panel for DetailPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn hotkey_action(&self) -> Option<HotkeyAction> {
        Some(HotkeyAction::DetailPanel)
    }

    fn render_panel(&mut self, ui: &mut Ui, explorer: &ExplorerState, actions: &mut Vec<UiAction>) {
        let selected = explorer.selected_points();
        ui.horizontal(|ui| {
            ui.strong(format!("Selected images ({})", selected.len()));
            if !selected.is_empty() && ui.small_button("clear").clicked() {
                actions.push(UiAction::ClearSelection);
            }
        });
        let Some(dataset) = explorer.dataset() else {
            ui.weak("No dataset loaded.");
            return;
        };
        if selected.is_empty() {
            ui.weak("Click a dot to select, Cmd/Ctrl-click to add more.");
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("detail_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for point in selected {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        self.item(ui, explorer, dataset, point);
                    });
                    ui.add_space(8.0);
                }
            });
    }
}
