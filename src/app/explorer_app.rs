//! Standalone explorer application.
//!
//! [`ExplorerApp`] owns the [`ExplorerState`], the scatter widget and the two
//! side panels, and implements [`eframe::App`]. Panels and hotkeys only push
//! [`UiAction`]s; the app applies them after the frame's panels have rendered
//! and publishes the resulting [`ExplorerEvent`]s.

use std::path::{Path, PathBuf};

use eframe::egui;

use crate::color_scheme::ColorScheme;
use crate::config::{ExplorerConfig, FeatureFlags};
use crate::data::derived::ColorMode;
use crate::data::providers::{load_from_bytes, load_from_file, LoadedDataset};
use crate::events::{
    DatasetMeta, DrawMeta, EventController, EventKind, ExplorerEvent, ExportMeta, FilterMeta,
    PointerMeta, ResizeMeta, SelectionMeta, ViewChangeMeta,
};
use crate::explorer::ExplorerState;
use crate::hotkeys::{detect_hotkey_actions, HotkeyAction, Hotkeys};
use crate::panels::{ControlsPanel, DetailPanel, Panel, ScatterStyle, ScatterView, UiAction};
use crate::view::engine::EngineEvent;
use crate::view::transform::CanvasSize;

use super::export::{default_png_name, save_view_png};

// ─────────────────────────────────────────────────────────────────────────────
// ExplorerApp
// ─────────────────────────────────────────────────────────────────────────────

pub struct ExplorerApp {
    pub explorer: ExplorerState,
    pub scatter: ScatterView,
    pub controls: ControlsPanel,
    pub detail: DetailPanel,

    pub features: FeatureFlags,
    pub hotkeys: Hotkeys,
    /// Receives every published [`ExplorerEvent`].
    pub events: Option<EventController>,

    /// Applied to the egui context on the first frame and on every change.
    pub color_scheme: ColorScheme,
    color_scheme_applied: bool,

    /// Last error or export notice, shown next to the status line.
    notice: Option<String>,
    last_canvas: Option<CanvasSize>,
}

impl Default for ExplorerApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerApp {
    pub fn new() -> Self {
        Self {
            explorer: ExplorerState::default(),
            scatter: ScatterView::default(),
            controls: ControlsPanel::default(),
            detail: DetailPanel::default(),
            features: FeatureFlags::default(),
            hotkeys: Hotkeys::default(),
            events: None,
            color_scheme: ColorScheme::default(),
            color_scheme_applied: false,
            notice: None,
            last_canvas: None,
        }
    }

    /// Apply features, view settings, theme and hotkeys from `cfg`.
    ///
    /// Without explicit hotkeys the saved ones are loaded, falling back to
    /// the defaults.
    pub fn apply_config(&mut self, cfg: &ExplorerConfig) {
        self.features = cfg.features.clone();
        self.scatter
            .engine_mut()
            .set_settings(cfg.view.engine_settings());
        self.explorer
            .set_point_size_range(cfg.view.point_size_range());
        self.explorer.set_point_size(cfg.view.point_size);

        self.color_scheme = cfg.view.color_scheme;
        self.controls.color_scheme = cfg.view.color_scheme;
        self.color_scheme_applied = false;

        self.hotkeys = match &cfg.hotkeys {
            Some(hk) => hk.clone(),
            None => Hotkeys::load_from_default_path().unwrap_or_else(|e| {
                log::debug!("using default hotkeys: {}", e);
                Hotkeys::default()
            }),
        };
        self.controls.hotkeys = self.hotkeys.clone();

        self.events = cfg.events.clone();
        if let Some(root) = &cfg.image_root {
            self.detail.base_dir = Some(root.clone());
        }
    }

    /// Text at the bottom of the window.
    pub fn status_text(&self) -> String {
        self.explorer.status_line(&self.scatter.engine().status())
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn emit(&self, event: ExplorerEvent) {
        if let Some(ctrl) = &self.events {
            ctrl.emit(event);
        }
    }

    fn report_error(&mut self, what: &str, err: impl std::fmt::Display) {
        log::warn!("{}: {}", what, err);
        self.notice = Some(format!("{}: {}", what, err));
    }

    // ── Dataset replacement ──────────────────────────────────────────────────

    /// Replace the dataset. Derived state, hover and selection reset; image
    /// paths resolve against `base_dir` from now on.
    pub fn load_dataset(&mut self, loaded: LoadedDataset, base_dir: Option<PathBuf>) {
        let had_selection = !self.explorer.selection().is_empty();
        let meta = DatasetMeta {
            name: loaded.dataset.name.clone(),
            method: loaded.dataset.method.clone(),
            point_count: loaded.dataset.positions.len(),
            source: loaded.source.clone(),
        };
        self.explorer.load(loaded);
        self.detail.base_dir = base_dir;
        self.detail.clear_cache();
        self.notice = None;

        let mut kinds = EventKind::DATASET_LOADED;
        if had_selection {
            kinds |= EventKind::SELECTION_CHANGED;
        }
        let mut evt = ExplorerEvent::new(kinds);
        evt.dataset = Some(meta);
        if had_selection {
            evt.selection = Some(SelectionMeta { ids: Vec::new() });
        }
        self.emit(evt);
    }

    /// Load a JSON document from disk; failures stay in the status line and
    /// keep the current dataset.
    pub fn open_path(&mut self, path: &Path) {
        match load_from_file(path) {
            Ok(loaded) => {
                let base = path.parent().map(Path::to_path_buf);
                self.load_dataset(loaded, base);
            }
            Err(e) => self.report_error(&format!("cannot load {}", path.display()), e),
        }
    }

    fn handle_dropped_files(&mut self, files: Vec<egui::DroppedFile>) {
        let Some(file) = files.into_iter().find(|f| is_json_name(&dropped_name(f))) else {
            return;
        };
        if let Some(path) = &file.path {
            self.open_path(path);
            return;
        }
        let name = dropped_name(&file);
        match file.bytes.as_deref() {
            Some(bytes) => match load_from_bytes(&name, bytes) {
                Ok(loaded) => self.load_dataset(loaded, None),
                Err(e) => self.report_error(&format!("cannot load {}", name), e),
            },
            None => self.report_error("dropped file", format!("{} has no readable content", name)),
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    fn hotkey_actions(&mut self, ctx: &egui::Context) -> Vec<UiAction> {
        let mut actions = Vec::new();
        for action in detect_hotkey_actions(&self.hotkeys, ctx) {
            match action {
                HotkeyAction::FitView => actions.push(UiAction::FitView),
                HotkeyAction::ClearSelection => actions.push(UiAction::ClearSelection),
                HotkeyAction::ToggleColorMode => {
                    let next = match self.explorer.color_mode() {
                        ColorMode::Cluster => ColorMode::Score,
                        ColorMode::Score => ColorMode::Cluster,
                    };
                    actions.push(UiAction::SetColorMode(next));
                }
                HotkeyAction::ControlsPanel => self.controls.toggle_visible(),
                HotkeyAction::DetailPanel => self.detail.toggle_visible(),
                HotkeyAction::SavePng => actions.push(UiAction::SavePng),
                HotkeyAction::OpenFile => actions.push(UiAction::OpenFile),
            }
        }
        actions
    }

    /// Apply one panel or hotkey request.
    pub fn apply_action(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::SetScheme(scheme) => {
                self.explorer.set_scheme(&scheme);
                self.emit_filter_changed();
            }
            UiAction::SetColorMode(mode) => {
                self.explorer.set_color_mode(mode);
                self.emit_filter_changed();
            }
            UiAction::SetClusterFilter(value) => {
                self.explorer.set_cluster_filter(value);
                self.emit_filter_changed();
            }
            UiAction::SetPointSize(size) => self.explorer.set_point_size(size),
            UiAction::SetColorScheme(scheme) => {
                self.color_scheme = scheme;
                self.controls.color_scheme = scheme;
                scheme.apply(ctx);
            }
            UiAction::FitView => self.scatter.engine_mut().fit(),
            UiAction::ClearSelection => {
                if self.explorer.clear_selection() {
                    self.emit_selection(EventKind::SELECTION_CHANGED);
                }
            }
            UiAction::OpenFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                {
                    self.open_path(&path);
                }
            }
            UiAction::SavePng => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PNG", &["png"])
                    .set_file_name(default_png_name(chrono::Local::now()))
                    .save_file()
                {
                    self.save_png(&path);
                }
            }
        }
        ctx.request_repaint();
    }

    /// Write the current view to `path` and publish an export event.
    pub fn save_png(&mut self, path: &Path) {
        match save_view_png(self.scatter.engine(), &self.explorer, self.color_scheme, path) {
            Ok(()) => {
                self.notice = Some(format!("Saved {}", path.display()));
                let mut evt = ExplorerEvent::new(EventKind::EXPORT);
                evt.export = Some(ExportMeta {
                    format: "png".to_string(),
                    path: Some(path.display().to_string()),
                });
                self.emit(evt);
            }
            Err(e) => self.report_error("PNG export failed", e),
        }
    }

    // ── Event publishing ─────────────────────────────────────────────────────

    fn emit_filter_changed(&self) {
        let mut evt = ExplorerEvent::new(EventKind::FILTER_CHANGED);
        evt.filter = Some(FilterMeta {
            scheme: self.explorer.scheme().to_string(),
            color_mode: self.explorer.color_mode().label().to_string(),
            value: self.explorer.cluster_filter().and_then(|v| v.key()),
            displayed: self.explorer.displayed_len(),
        });
        self.emit(evt);
    }

    fn emit_selection(&self, kinds: EventKind) {
        let mut evt = ExplorerEvent::new(kinds);
        evt.selection = Some(SelectionMeta {
            ids: self.explorer.selection().ids().to_vec(),
        });
        self.emit(evt);
    }

    fn pointer_meta(&self, index: Option<usize>) -> PointerMeta {
        let engine = self.scatter.engine();
        let point = index.and_then(|i| self.explorer.displayed_points().get(i).copied());
        PointerMeta {
            screen: point.map(|p| {
                engine
                    .transform()
                    .world_to_screen(p.x, p.y, engine.canvas_size())
            }),
            world: point.map(|p| (p.x, p.y)),
            point_id: point.map(|p| p.id),
        }
    }

    fn view_change_meta(&self) -> ViewChangeMeta {
        let t = self.scatter.engine().transform();
        ViewChangeMeta {
            scale: t.scale,
            translate: (t.translate_x, t.translate_y),
        }
    }

    /// Turn engine outputs into state changes and published events.
    pub fn handle_engine_events(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::HoverChanged(index) => {
                    let mut evt = ExplorerEvent::new(EventKind::HOVER);
                    evt.pointer = Some(self.pointer_meta(index));
                    self.emit(evt);
                }
                EngineEvent::Clicked { index, modifiers } => {
                    let pointer = self.pointer_meta(index);
                    let changed = self.explorer.apply_click(index, modifiers);
                    let mut kinds = EventKind::CLICK;
                    if changed {
                        log::debug!("selection: {:?}", self.explorer.selection().ids());
                        kinds |= EventKind::SELECTION_CHANGED;
                    }
                    let mut evt = ExplorerEvent::new(kinds);
                    evt.pointer = Some(pointer);
                    evt.selection = Some(SelectionMeta {
                        ids: self.explorer.selection().ids().to_vec(),
                    });
                    self.emit(evt);
                }
                EngineEvent::Panned => {
                    let mut evt = ExplorerEvent::new(EventKind::PAN);
                    evt.view_change = Some(self.view_change_meta());
                    self.emit(evt);
                }
                EngineEvent::Zoomed { .. } => {
                    let mut evt = ExplorerEvent::new(EventKind::ZOOM);
                    evt.view_change = Some(self.view_change_meta());
                    self.emit(evt);
                }
                EngineEvent::Fitted => {
                    let mut evt = ExplorerEvent::new(EventKind::FIT_TO_VIEW);
                    evt.view_change = Some(self.view_change_meta());
                    self.emit(evt);
                }
                EngineEvent::Drawn(stats) => {
                    let mut evt = ExplorerEvent::new(EventKind::DRAW);
                    evt.draw = Some(DrawMeta {
                        point_count: stats.point_count,
                        duration_ms: stats.duration.as_secs_f64() * 1000.0,
                    });
                    self.emit(evt);
                }
            }
        }

        let canvas = self.scatter.engine().canvas_size();
        if self.last_canvas != Some(canvas) {
            self.last_canvas = Some(canvas);
            let mut evt = ExplorerEvent::new(EventKind::RESIZE);
            evt.resize = Some(ResizeMeta {
                width: canvas.width,
                height: canvas.height,
                pixels_per_point: self.scatter.engine().pixels_per_point(),
            });
            self.emit(evt);
        }
    }
}

fn dropped_name(file: &egui::DroppedFile) -> String {
    match &file.path {
        Some(p) => p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        None => file.name.clone(),
    }
}

fn is_json_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".json")
}

// ─────────────────────────────────────────────────────────────────────────────
// eframe integration
// ─────────────────────────────────────────────────────────────────────────────

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.color_scheme_applied {
            self.color_scheme.apply(ctx);
            self.color_scheme_applied = true;
        }

        let mut actions = self.hotkey_actions(ctx);

        if self.features.drag_and_drop {
            let dropped = ctx.input(|i| i.raw.dropped_files.clone());
            if !dropped.is_empty() {
                self.handle_dropped_files(dropped);
            }
        }

        let status = self.status_text();
        self.controls.status = status.clone();

        if self.features.status_line {
            egui::TopBottomPanel::bottom("explorer_status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.weak(&status);
                    if let Some(notice) = &self.notice {
                        ui.separator();
                        ui.label(notice);
                    }
                });
            });
        }

        if self.features.controls && self.controls.state().visible {
            egui::SidePanel::left("explorer_controls")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.heading(self.controls.title_and_icon());
                    ui.separator();
                    self.controls.render_panel(ui, &self.explorer, &mut actions);
                });
        }

        if self.features.detail && self.detail.state().visible {
            egui::SidePanel::right("explorer_detail")
                .resizable(true)
                .default_width(360.0)
                .show(ctx, |ui| {
                    ui.heading(self.detail.title_and_icon());
                    ui.separator();
                    self.detail.render_panel(ui, &self.explorer, &mut actions);
                });
        }

        let style = ScatterStyle {
            theme: self.color_scheme,
            highlights: self.features.highlights,
        };
        let engine_events = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let events = self.scatter.show(ui, &mut self.explorer, style);
                if self.explorer.dataset().is_none() {
                    ui.painter().text(
                        self.scatter.rect().center(),
                        egui::Align2::CENTER_CENTER,
                        "Open or drop a dataset .json",
                        egui::FontId::proportional(16.0),
                        ui.visuals().weak_text_color(),
                    );
                }
                events
            })
            .inner;

        let selected_before = self.explorer.selection().ids().to_vec();
        self.handle_engine_events(engine_events);
        if self.explorer.selection().ids() != selected_before.as_slice() {
            ctx.request_repaint();
        }

        for action in actions {
            self.apply_action(action, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::parse_dataset;
    use crate::data::selection::ClickModifiers;
    use crate::events::EventFilter;

    fn loaded() -> LoadedDataset {
        let dataset = parse_dataset(serde_json::json!({
            "name": "demo",
            "cluster_labels": {"kmeans": [0, 1]},
            "positions": [
                {"id": 7, "x": 0.0, "y": 0.0, "cluster_labels": {"kmeans": 0}},
                {"id": 8, "x": 2.0, "y": 1.0, "cluster_labels": {"kmeans": 1}}
            ]
        }))
        .unwrap();
        LoadedDataset {
            dataset,
            source: "inline".into(),
        }
    }

    #[test]
    fn loading_publishes_dataset_event() {
        let ctrl = EventController::new();
        let rx = ctrl.subscribe(EventFilter::only(EventKind::DATASET_LOADED));
        let mut app = ExplorerApp::new();
        app.events = Some(ctrl);
        app.load_dataset(loaded(), None);
        let evt = rx.try_recv().unwrap();
        let meta = evt.dataset.unwrap();
        assert_eq!(meta.name, "demo");
        assert_eq!(meta.point_count, 2);
        assert_eq!(meta.source, "inline");
    }

    #[test]
    fn click_event_updates_selection_and_publishes() {
        let ctrl = EventController::new();
        let rx = ctrl.subscribe(EventFilter::only(EventKind::SELECTION_CHANGED));
        let mut app = ExplorerApp::new();
        app.events = Some(ctrl);
        app.load_dataset(loaded(), None);
        app.handle_engine_events(vec![EngineEvent::Clicked {
            index: Some(1),
            modifiers: ClickModifiers::NONE,
        }]);
        assert_eq!(app.explorer.selection().ids(), &[8]);
        let evt = rx.try_recv().unwrap();
        assert!(evt.kinds.contains(EventKind::CLICK));
        assert_eq!(evt.selection.unwrap().ids, vec![8]);
        assert_eq!(evt.pointer.unwrap().point_id, Some(8));
    }

    #[test]
    fn filter_actions_publish_filter_state() {
        let ctx = egui::Context::default();
        let ctrl = EventController::new();
        let rx = ctrl.subscribe(EventFilter::only(EventKind::FILTER_CHANGED));
        let mut app = ExplorerApp::new();
        app.events = Some(ctrl);
        app.load_dataset(loaded(), None);
        app.apply_action(
            UiAction::SetClusterFilter(Some(crate::data::dataset::LabelValue::Numeric(1.0))),
            &ctx,
        );
        let meta = rx.try_recv().unwrap().filter.unwrap();
        assert_eq!(meta.scheme, "kmeans");
        assert_eq!(meta.value.as_deref(), Some("1"));
        assert_eq!(meta.displayed, 1);
    }

    #[test]
    fn failed_open_keeps_dataset_and_sets_notice() {
        let mut app = ExplorerApp::new();
        app.load_dataset(loaded(), None);
        app.open_path(Path::new("/definitely/not/here.json"));
        assert!(app.notice().is_some_and(|n| n.contains("cannot load")));
        assert_eq!(app.explorer.dataset().map(|d| d.positions.len()), Some(2));
    }

    #[test]
    fn json_names_are_case_insensitive() {
        assert!(is_json_name("a.JSON"));
        assert!(!is_json_name("a.csv"));
    }
}
