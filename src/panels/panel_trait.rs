use egui::Ui;

use crate::color_scheme::ColorScheme;
use crate::data::dataset::LabelValue;
use crate::data::derived::ColorMode;
use crate::explorer::ExplorerState;
use crate::hotkeys::HotkeyAction;

#[derive(Debug, Clone, Copy)]
pub struct PanelState {
    pub title: &'static str,
    pub icon: Option<&'static str>,
    pub visible: bool,
}

impl PanelState {
    pub fn new(title: &'static str, icon: Option<&'static str>) -> Self {
        Self {
            title,
            icon,
            visible: true,
        }
    }
}

/// Requests a panel makes of the app. Applied after the panel has rendered
/// so every panel in a frame sees the same state.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetScheme(String),
    SetColorMode(ColorMode),
    SetClusterFilter(Option<LabelValue>),
    SetPointSize(f64),
    SetColorScheme(ColorScheme),
    FitView,
    ClearSelection,
    OpenFile,
    SavePng,
}

pub trait Panel {
    fn state(&self) -> &PanelState;
    fn state_mut(&mut self) -> &mut PanelState;

    fn title(&self) -> &'static str {
        self.state().title
    }

    fn icon_only(&self) -> Option<&'static str> {
        self.state().icon
    }

    fn title_and_icon(&self) -> String {
        match self.icon_only() {
            Some(icon) => format!("{} {}", icon, self.title()),
            None => self.title().to_string(),
        }
    }

    /// Hotkey that toggles this panel, if any.
    fn hotkey_action(&self) -> Option<HotkeyAction> {
        None
    }

    fn toggle_visible(&mut self) {
        let s = self.state_mut();
        s.visible = !s.visible;
    }

    fn render_panel(&mut self, ui: &mut Ui, explorer: &ExplorerState, actions: &mut Vec<UiAction>);
}
