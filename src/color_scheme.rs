//! Visual themes for the explorer UI.
//!
//! A [`ColorScheme`] sets the egui visuals and the handful of colors the
//! scatter canvas paints itself (background, hover ring, selection ring).
//! Point fill colors are data-driven and do not depend on the theme.

use eframe::egui::{Color32, Context, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Dark,
    Light,
    SolarizedDark,
    Nord,
    Dracula,
    /// Pure black background with white chrome.
    HighContrast,
}

impl ColorScheme {
    /// All built-in schemes (for combo boxes).
    pub fn all() -> &'static [ColorScheme] {
        &[
            ColorScheme::Dark,
            ColorScheme::Light,
            ColorScheme::SolarizedDark,
            ColorScheme::Nord,
            ColorScheme::Dracula,
            ColorScheme::HighContrast,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::Dark => "Dark",
            ColorScheme::Light => "Light",
            ColorScheme::SolarizedDark => "Solarized Dark",
            ColorScheme::Nord => "Nord",
            ColorScheme::Dracula => "Dracula",
            ColorScheme::HighContrast => "High Contrast",
        }
    }

    pub fn is_dark(&self) -> bool {
        !matches!(self, ColorScheme::Light)
    }

    /// Fill behind the scatter points.
    pub fn canvas_background(&self) -> Color32 {
        match self {
            ColorScheme::Dark => Color32::from_rgb(10, 10, 10),
            ColorScheme::Light => Color32::from_rgb(248, 248, 248),
            ColorScheme::SolarizedDark => Color32::from_rgb(0, 43, 54),
            ColorScheme::Nord => Color32::from_rgb(46, 52, 64),
            ColorScheme::Dracula => Color32::from_rgb(40, 42, 54),
            ColorScheme::HighContrast => Color32::BLACK,
        }
    }

    /// Ring drawn around the hovered point.
    pub fn hover_stroke(&self) -> Color32 {
        if self.is_dark() {
            Color32::WHITE
        } else {
            Color32::from_rgb(20, 20, 20)
        }
    }

    /// Ring drawn around selected points.
    pub fn selection_stroke(&self) -> Color32 {
        match self {
            ColorScheme::Light => Color32::from_rgb(217, 70, 239),
            _ => Color32::from_rgb(250, 204, 21),
        }
    }

    /// Apply this scheme's visuals to an egui context.
    pub fn apply(&self, ctx: &Context) {
        ctx.set_visuals(self.visuals());
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            ColorScheme::Dark => {
                let mut v = Visuals::dark();
                v.panel_fill = Color32::from_rgb(10, 10, 10);
                v.override_text_color = Some(Color32::from_rgb(229, 229, 229));
                v
            }
            ColorScheme::Light => Visuals::light(),
            ColorScheme::SolarizedDark => {
                let mut v = Visuals::dark();
                let base03 = Color32::from_rgb(0, 43, 54);
                let base02 = Color32::from_rgb(7, 54, 66);
                let base01 = Color32::from_rgb(88, 110, 117);
                let base0 = Color32::from_rgb(131, 148, 150);
                v.panel_fill = base03;
                v.window_fill = base02;
                v.extreme_bg_color = base03;
                v.faint_bg_color = base02;
                v.override_text_color = Some(base0);
                v.widgets.noninteractive.bg_fill = base02;
                v.widgets.inactive.bg_fill = base02;
                v.widgets.inactive.fg_stroke.color = base01;
                v.widgets.hovered.bg_fill = base01;
                v.widgets.active.bg_fill = base01;
                v
            }
            ColorScheme::Nord => {
                let mut v = Visuals::dark();
                let polar0 = Color32::from_rgb(46, 52, 64);
                let polar1 = Color32::from_rgb(59, 66, 82);
                let snow0 = Color32::from_rgb(216, 222, 233);
                v.panel_fill = polar0;
                v.window_fill = polar1;
                v.extreme_bg_color = polar0;
                v.faint_bg_color = polar1;
                v.override_text_color = Some(snow0);
                v.widgets.noninteractive.bg_fill = polar1;
                v.widgets.hovered.bg_fill = Color32::from_rgb(76, 86, 106);
                v
            }
            ColorScheme::Dracula => {
                let mut v = Visuals::dark();
                let bg = Color32::from_rgb(40, 42, 54);
                let current = Color32::from_rgb(68, 71, 90);
                v.panel_fill = bg;
                v.window_fill = current;
                v.extreme_bg_color = bg;
                v.faint_bg_color = current;
                v.override_text_color = Some(Color32::from_rgb(248, 248, 242));
                v.widgets.noninteractive.bg_fill = current;
                v.widgets.hovered.bg_fill = Color32::from_rgb(98, 114, 164);
                v
            }
            ColorScheme::HighContrast => {
                let mut v = Visuals::dark();
                v.panel_fill = Color32::BLACK;
                v.window_fill = Color32::from_rgb(10, 10, 10);
                v.extreme_bg_color = Color32::BLACK;
                v.faint_bg_color = Color32::from_rgb(20, 20, 20);
                v.override_text_color = Some(Color32::WHITE);
                v
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = ColorScheme::all().iter().map(|s| s.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), ColorScheme::all().len());
    }

    #[test]
    fn serde_names_are_snake_case() {
        let yaml = serde_yaml::to_string(&ColorScheme::SolarizedDark).unwrap();
        assert_eq!(yaml.trim(), "solarized_dark");
        let back: ColorScheme = serde_yaml::from_str("high_contrast").unwrap();
        assert_eq!(back, ColorScheme::HighContrast);
    }

    #[test]
    fn light_scheme_uses_dark_hover_ring() {
        assert!(!ColorScheme::Light.is_dark());
        assert_ne!(ColorScheme::Light.hover_stroke(), Color32::WHITE);
    }
}
