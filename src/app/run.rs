//! Top-level entry point for running the explorer as a native window.

use eframe::egui;

use crate::config::ExplorerConfig;
use crate::data::providers::LoadedDataset;

use super::explorer_app::ExplorerApp;

/// Launch the explorer in a native window, optionally with a dataset
/// already loaded. Blocks until the window is closed.
pub fn run_explorer(initial: Option<LoadedDataset>, mut cfg: ExplorerConfig) -> eframe::Result<()> {
    let mut app = ExplorerApp::new();
    app.apply_config(&cfg);
    if let Some(loaded) = initial {
        app.load_dataset(loaded, cfg.image_root.clone());
    }

    let title = cfg.title.clone();
    let mut opts = cfg.native_options.take().unwrap_or_default();

    if opts.viewport.icon.is_none() {
        if let Some(icon) = load_app_icon_svg() {
            opts.viewport = opts.viewport.clone().with_icon(icon);
        }
    }
    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1400.0, 900.0));
    }
    opts.viewport = opts.viewport.clone().with_drag_and_drop(cfg.features.drag_and_drop);

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}

/// Render the bundled `icon.svg`; `None` when it is missing or unreadable.
fn load_app_icon_svg() -> Option<egui::IconData> {
    let svg_path = concat!(env!("CARGO_MANIFEST_DIR"), "/icon.svg");
    let data = std::fs::read(svg_path).ok()?;
    render_icon(&data)
}

fn render_icon(svg: &[u8]) -> Option<egui::IconData> {
    let tree = usvg::Tree::from_data(svg, &usvg::Options::default()).ok()?;
    let size = tree.size().to_int_size();
    if size.width() == 0 || size.height() == 0 {
        return None;
    }
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Some(egui::IconData {
        width: size.width(),
        height: size.height(),
        rgba: pixmap.take(),
    })
}
