//! Prediction and annotation boxes drawn over an item's image.

use egui::{Color32, Pos2, Rect, Vec2};

use super::dataset::{BBox, Dataset, Point};

pub const PREDICTION_STROKE: Color32 = Color32::from_rgb(34, 197, 94);
pub const ANNOTATION_STROKE: Color32 = Color32::from_rgb(96, 165, 250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Prediction,
    Annotation,
}

impl BoxKind {
    pub fn stroke_color(&self) -> Color32 {
        match self {
            BoxKind::Prediction => PREDICTION_STROKE,
            BoxKind::Annotation => ANNOTATION_STROKE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub bbox: BBox,
    pub category: String,
    pub score: Option<f64>,
    pub kind: BoxKind,
}

impl OverlayBox {
    /// `"category (0.123)"`, or just the category without a score.
    pub fn caption(&self) -> String {
        match self.score {
            Some(s) => format!("{} ({:.3})", self.category, s),
            None => self.category.clone(),
        }
    }
}

/// The prediction box (if any) followed by the image's annotation boxes.
/// Entries without a well-formed bbox are skipped.
pub fn overlay_boxes(dataset: &Dataset, point: &Point) -> Vec<OverlayBox> {
    let mut out = Vec::new();
    if let Some(pred) = point.prediction() {
        if let Some(bbox) = pred.bbox {
            out.push(OverlayBox {
                bbox,
                category: pred.category.clone().unwrap_or_default(),
                score: pred.score,
                kind: BoxKind::Prediction,
            });
        }
    }
    for ann in dataset.annotations_for(point) {
        if let Some(bbox) = ann.bbox {
            out.push(OverlayBox {
                bbox,
                category: ann.category.clone().unwrap_or_default(),
                score: None,
                kind: BoxKind::Annotation,
            });
        }
    }
    out
}

/// Map an image-pixel box onto the rect where the image is shown.
///
/// Returns `None` until the image's natural size is known.
pub fn to_widget_rect(bbox: &BBox, natural: Vec2, shown: Rect) -> Option<Rect> {
    if natural.x <= 0.0 || natural.y <= 0.0 || shown.width() <= 0.0 || shown.height() <= 0.0 {
        return None;
    }
    let sx = shown.width() / natural.x;
    let sy = shown.height() / natural.y;
    let left = (bbox.x1() as f32 * sx).round();
    let top = (bbox.y1() as f32 * sy).round();
    let width = ((bbox.x2() - bbox.x1()) as f32 * sx).round().max(0.0);
    let height = ((bbox.y2() - bbox.y1()) as f32 * sy).round().max(0.0);
    Some(Rect::from_min_size(
        shown.min + Vec2::new(left, top),
        Vec2::new(width, height),
    ))
}

/// Caption position: above the box when it fits inside `image`, otherwise inside.
/// The flag is `true` when the caption sits inside the box.
pub fn caption_anchor(rect: Rect, image: Rect, label_height: f32) -> (Pos2, bool) {
    const PAD: f32 = 2.0;
    let above = rect.top() - (label_height + 6.0);
    if above >= image.top() {
        (Pos2::new(rect.left() + PAD, above), false)
    } else {
        (Pos2::new(rect.left() + PAD, rect.top() + PAD), true)
    }
}
