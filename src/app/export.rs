//! PNG snapshot of the scatter view.

use std::path::Path;

use chrono::{DateTime, Local};

use crate::color_scheme::ColorScheme;
use crate::error::ExportError;
use crate::explorer::ExplorerState;
use crate::view::engine::{RenderParams, ScatterEngine};

/// `embedding_20260102_030405.png`
pub fn default_png_name(now: DateTime<Local>) -> String {
    format!("embedding_{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Render the displayed points with the engine's current transform at the
/// on-screen canvas resolution and write them to `path`.
pub fn save_view_png(
    engine: &ScatterEngine,
    explorer: &ExplorerState,
    theme: ColorScheme,
    path: &Path,
) -> Result<(), ExportError> {
    let points = explorer.displayed_points();
    let params = RenderParams {
        scheme: explorer.scheme(),
        color_mode: explorer.color_mode(),
        point_size: explorer.point_size(),
    };
    let canvas = engine
        .render_offscreen(&points, params, theme.canvas_background())
        .ok_or(ExportError::EmptyCanvas)?;
    canvas.save_png(path)?;
    log::info!("saved {} points to {:?}", points.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::data::dataset::parse_dataset;
    use crate::data::providers::LoadedDataset;
    use crate::view::transform::CanvasSize;

    #[test]
    fn default_name_carries_timestamp() {
        let t = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(default_png_name(t), "embedding_20260102_030405.png");
    }

    #[test]
    fn zero_sized_canvas_is_an_error() {
        let engine = ScatterEngine::default();
        let explorer = ExplorerState::default();
        let path = std::env::temp_dir().join("embedding_explorer_never_written.png");
        let err = save_view_png(&engine, &explorer, ColorScheme::Dark, &path).unwrap_err();
        assert!(matches!(err, ExportError::EmptyCanvas));
    }

    #[test]
    fn writes_png_of_canvas_size() {
        let ds = parse_dataset(serde_json::json!({
            "positions": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 1.0, "y": 1.0}]
        }))
        .unwrap();
        let mut explorer = ExplorerState::default();
        explorer.load(LoadedDataset {
            dataset: ds,
            source: "test".into(),
        });
        let mut engine = ScatterEngine::default();
        engine.resize(CanvasSize::new(64.0, 48.0), 1.0);
        engine.set_bounds(explorer.bounds());

        let dir = std::env::temp_dir().join(format!("embedding_explorer_png_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("view.png");
        save_view_png(&engine, &explorer, ColorScheme::Light, &path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
