//! Controls panel: scheme, color mode, cluster filter, point size, cluster
//! counts and the file/view actions.

use egui::Ui;
use egui_phosphor::regular::{CAMERA, CORNERS_OUT, FOLDER_OPEN, SLIDERS_HORIZONTAL, X_CIRCLE};

use super::panel_trait::{Panel, PanelState, UiAction};
use crate::color_scheme::ColorScheme;
use crate::data::dataset::LabelValue;
use crate::data::derived::ColorMode;
use crate::explorer::{ExplorerState, FALLBACK_SCHEME};
use crate::hotkeys::{format_button_tooltip, HotkeyAction, Hotkeys};

pub struct ControlsPanel {
    state: PanelState,
    /// Engine status, refreshed by the app before each render.
    pub status: String,
    pub color_scheme: ColorScheme,
    pub hotkeys: Hotkeys,
}

impl Default for ControlsPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Controls", Some(SLIDERS_HORIZONTAL)),
            status: String::new(),
            color_scheme: ColorScheme::default(),
            hotkeys: Hotkeys::default(),
        }
    }
}

/// Text shown for a filter entry; `None` is the pass-through entry.
pub fn filter_choice_text(value: Option<&LabelValue>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(all)".to_string(),
    }
}

/// The filter value a picked entry stands for. Entries are matched as text,
/// so a canonical number string comes back as a number.
pub fn filter_from_choice(value: &LabelValue) -> Option<LabelValue> {
    LabelValue::from_choice(&value.to_string())
}

impl ControlsPanel {
    fn action_button(
        &self,
        ui: &mut Ui,
        icon: &str,
        action: HotkeyAction,
        enabled: bool,
    ) -> bool {
        let text = format!("{} {}", icon, action.description());
        let tip = format_button_tooltip(action.description(), self.hotkeys.get(action));
        ui.add_enabled(enabled, egui::Button::new(text))
            .on_hover_text(tip)
            .clicked()
    }

    fn header(&self, ui: &mut Ui, explorer: &ExplorerState) {
        let (name, method) = match explorer.dataset() {
            Some(ds) => (ds.name.as_str(), ds.method.as_str()),
            None => ("(no name)", "(no method)"),
        };
        ui.strong(format!("{} / {}", name, method));
    }

    fn selectors(&self, ui: &mut Ui, explorer: &ExplorerState, actions: &mut Vec<UiAction>) {
        let cluster_enabled = explorer.cluster_enabled();
        let keys = explorer.scheme_keys();

        egui::Grid::new("controls_grid")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Cluster");
                ui.add_enabled_ui(cluster_enabled, |ui| {
                    let shown = if cluster_enabled {
                        explorer.scheme().to_string()
                    } else {
                        "(no clusters)".to_string()
                    };
                    egui::ComboBox::from_id_salt("scheme")
                        .selected_text(shown)
                        .show_ui(ui, |ui| {
                            for key in &keys {
                                if ui
                                    .selectable_label(key == explorer.scheme(), key)
                                    .clicked()
                                {
                                    actions.push(UiAction::SetScheme(key.clone()));
                                }
                            }
                            if keys.is_empty() {
                                ui.label(FALLBACK_SCHEME);
                            }
                        });
                });
                ui.end_row();

                ui.label("Color by");
                egui::ComboBox::from_id_salt("color_mode")
                    .selected_text(explorer.color_mode().label())
                    .show_ui(ui, |ui| {
                        for mode in [ColorMode::Cluster, ColorMode::Score] {
                            let enabled = mode != ColorMode::Cluster || cluster_enabled;
                            let resp = ui.add_enabled(
                                enabled,
                                egui::Button::selectable(explorer.color_mode() == mode, mode.label()),
                            );
                            if resp.clicked() && explorer.color_mode() != mode {
                                actions.push(UiAction::SetColorMode(mode));
                            }
                        }
                    });
                ui.end_row();

                if explorer.color_mode() == ColorMode::Cluster {
                    ui.label("Filter cluster");
                    ui.add_enabled_ui(cluster_enabled, |ui| {
                        egui::ComboBox::from_id_salt("cluster_filter")
                            .selected_text(filter_choice_text(explorer.cluster_filter()))
                            .show_ui(ui, |ui| {
                                if ui
                                    .selectable_label(explorer.cluster_filter().is_none(), "(all)")
                                    .clicked()
                                {
                                    actions.push(UiAction::SetClusterFilter(None));
                                }
                                for v in explorer.available_cluster_values() {
                                    let picked = explorer.cluster_filter().is_some_and(|f| {
                                        f.key() == v.key()
                                    });
                                    if ui
                                        .selectable_label(picked, filter_choice_text(Some(v)))
                                        .clicked()
                                    {
                                        actions.push(UiAction::SetClusterFilter(filter_from_choice(v)));
                                    }
                                }
                            });
                    });
                    ui.end_row();
                }

                ui.label("Point size");
                let range = explorer.point_size_range();
                let mut size = explorer.point_size();
                let resp = ui.add(egui::Slider::new(&mut size, range.min..=range.max).step_by(0.5));
                if resp.changed() {
                    actions.push(UiAction::SetPointSize(size));
                }
                ui.end_row();

                ui.label("Theme");
                egui::ComboBox::from_id_salt("color_scheme")
                    .selected_text(self.color_scheme.label())
                    .show_ui(ui, |ui| {
                        for scheme in ColorScheme::all() {
                            if ui
                                .selectable_label(*scheme == self.color_scheme, scheme.label())
                                .clicked()
                            {
                                actions.push(UiAction::SetColorScheme(*scheme));
                            }
                        }
                    });
                ui.end_row();
            });
    }

    fn distribution(&self, ui: &mut Ui, explorer: &ExplorerState) {
        let rows = explorer.cluster_distribution();
        if explorer.color_mode() != ColorMode::Cluster || rows.is_empty() {
            return;
        }
        ui.add_space(6.0);
        ui.strong("Cluster counts");
        egui::ScrollArea::vertical()
            .id_salt("cluster_counts")
            .max_height(140.0)
            .show(ui, |ui| {
                egui::Grid::new("cluster_counts_grid")
                    .num_columns(4)
                    .striped(true)
                    .show(ui, |ui| {
                        for (i, (label, count)) in rows.iter().enumerate() {
                            ui.label(label);
                            ui.weak(count.to_string());
                            if i % 2 == 1 {
                                ui.end_row();
                            }
                        }
                    });
            });
    }
}

impl Panel for ControlsPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn hotkey_action(&self) -> Option<HotkeyAction> {
        Some(HotkeyAction::ControlsPanel)
    }

    fn render_panel(&mut self, ui: &mut Ui, explorer: &ExplorerState, actions: &mut Vec<UiAction>) {
        self.header(ui, explorer);
        ui.add_space(4.0);
        self.selectors(ui, explorer, actions);
        self.distribution(ui, explorer);

        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            let has_data = explorer.dataset().is_some();
            if self.action_button(ui, CORNERS_OUT, HotkeyAction::FitView, has_data) {
                actions.push(UiAction::FitView);
            }
            let has_sel = !explorer.selection().is_empty();
            if self.action_button(ui, X_CIRCLE, HotkeyAction::ClearSelection, has_sel) {
                actions.push(UiAction::ClearSelection);
            }
            if self.action_button(ui, FOLDER_OPEN, HotkeyAction::OpenFile, true) {
                actions.push(UiAction::OpenFile);
            }
            if self.action_button(ui, CAMERA, HotkeyAction::SavePng, has_data) {
                actions.push(UiAction::SavePng);
            }
        });

        if !self.status.is_empty() {
            ui.add_space(6.0);
            ui.weak(&self.status);
        }
        ui.add_space(4.0);
        ui.weak("Drop a .json file onto the window to load it.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_entries_render_canonical_text() {
        assert_eq!(filter_choice_text(None), "(all)");
        assert_eq!(filter_choice_text(Some(&LabelValue::Numeric(3.0))), "3");
        assert_eq!(filter_choice_text(Some(&LabelValue::Named("cats".into()))), "cats");
    }

    #[test]
    fn numeric_text_choice_coerces_to_number() {
        assert_eq!(
            filter_from_choice(&LabelValue::Named("3".into())),
            Some(LabelValue::Numeric(3.0))
        );
        assert_eq!(
            filter_from_choice(&LabelValue::Named("03".into())),
            Some(LabelValue::Named("03".into()))
        );
    }

    #[test]
    fn panel_advertises_its_hotkey() {
        let p = ControlsPanel::default();
        assert_eq!(p.hotkey_action(), Some(HotkeyAction::ControlsPanel));
        assert!(p.title_and_icon().contains("Controls"));
    }
}
