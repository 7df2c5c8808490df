//! Hotkeys representation, parsing and detection for the explorer UI.
//!
//! Bindings are persisted as YAML in `~/.embedding_explorer/hotkeys.yaml`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use eframe::egui;

use crate::config::config_dir;
use crate::error::ConfigError;

/// Modifier keys (combinations) used for hotkeys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    None,
    Ctrl,
    Alt,
    Shift,
    CtrlAlt,
    CtrlShift,
    AltShift,
    CtrlAltShift,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Modifier::None => "",
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::CtrlAlt => "Ctrl+Alt",
            Modifier::CtrlShift => "Ctrl+Shift",
            Modifier::AltShift => "Alt+Shift",
            Modifier::CtrlAltShift => "Ctrl+Alt+Shift",
        };
        write!(f, "{}", s)
    }
}

impl Modifier {
    /// Command is folded into Ctrl so bindings work the same on macOS.
    pub fn from_egui(m: &egui::Modifiers) -> Modifier {
        match (m.ctrl || m.command, m.alt, m.shift) {
            (false, false, false) => Modifier::None,
            (true, false, false) => Modifier::Ctrl,
            (false, true, false) => Modifier::Alt,
            (false, false, true) => Modifier::Shift,
            (true, true, false) => Modifier::CtrlAlt,
            (true, false, true) => Modifier::CtrlShift,
            (false, true, true) => Modifier::AltShift,
            (true, true, true) => Modifier::CtrlAltShift,
        }
    }
}

/// A single hotkey: modifier combination plus an upper-case character key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkey {
    pub modifier: Modifier,
    pub key: char,
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            ' ' => "Space".to_string(),
            other => other.to_string(),
        };
        if self.modifier == Modifier::None {
            write!(f, "{}", key)
        } else {
            write!(f, "{}+{}", self.modifier, key)
        }
    }
}

impl FromStr for Hotkey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty hotkey".to_string());
        }
        // "F", "Ctrl+O", "Ctrl+Alt+X", "Space"
        let parts: Vec<&str> = s.split('+').map(|p| p.trim()).collect();
        let Some((last, mods)) = parts.split_last() else {
            return Err("invalid hotkey".to_string());
        };
        let key = if last.eq_ignore_ascii_case("space") {
            ' '
        } else {
            let mut chars = last.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_ascii_uppercase(),
                (None, _) => return Err("no key char".to_string()),
                (Some(_), Some(_)) => return Err(format!("unknown key '{}'", last)),
            }
        };

        let mut lowers: Vec<String> = mods.iter().map(|m| m.to_lowercase()).collect();
        lowers.sort();
        lowers.dedup();
        let lowers: Vec<&str> = lowers.iter().map(String::as_str).collect();
        let modifier = match lowers.as_slice() {
            [] => Modifier::None,
            ["ctrl"] | ["control"] => Modifier::Ctrl,
            ["alt"] => Modifier::Alt,
            ["shift"] => Modifier::Shift,
            ["alt", "ctrl"] => Modifier::CtrlAlt,
            ["ctrl", "shift"] => Modifier::CtrlShift,
            ["alt", "shift"] => Modifier::AltShift,
            ["alt", "ctrl", "shift"] => Modifier::CtrlAltShift,
            other => return Err(format!("unknown modifier combo '{:?}'", other)),
        };
        Ok(Hotkey { modifier, key })
    }
}

impl Hotkey {
    pub fn new(modifier: Modifier, key: char) -> Self {
        Self { modifier, key }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bindings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkeys {
    pub fit_view: Option<Hotkey>,
    pub clear_selection: Option<Hotkey>,
    pub toggle_color_mode: Option<Hotkey>,
    pub controls_panel: Option<Hotkey>,
    pub detail_panel: Option<Hotkey>,
    pub save_png: Option<Hotkey>,
    pub open_file: Option<Hotkey>,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            fit_view: Some(Hotkey::new(Modifier::None, 'F')),
            clear_selection: Some(Hotkey::new(Modifier::None, 'X')),
            toggle_color_mode: Some(Hotkey::new(Modifier::None, 'C')),
            controls_panel: Some(Hotkey::new(Modifier::None, 'L')),
            detail_panel: Some(Hotkey::new(Modifier::None, 'D')),
            save_png: Some(Hotkey::new(Modifier::None, 'S')),
            open_file: Some(Hotkey::new(Modifier::Ctrl, 'O')),
        }
    }
}

impl Hotkeys {
    pub fn reset_defaults(&mut self) {
        *self = Hotkeys::default();
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("hotkeys.yaml"))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let s = serde_yaml::to_string(self)?;
        fs::write(path, s).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_path(path: &Path) -> Result<Hotkeys, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&s)?)
    }

    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::default_path()?)
    }

    pub fn load_from_default_path() -> Result<Hotkeys, ConfigError> {
        Self::load_from_path(&Self::default_path()?)
    }

    pub fn get(&self, action: HotkeyAction) -> Option<&Hotkey> {
        match action {
            HotkeyAction::FitView => self.fit_view.as_ref(),
            HotkeyAction::ClearSelection => self.clear_selection.as_ref(),
            HotkeyAction::ToggleColorMode => self.toggle_color_mode.as_ref(),
            HotkeyAction::ControlsPanel => self.controls_panel.as_ref(),
            HotkeyAction::DetailPanel => self.detail_panel.as_ref(),
            HotkeyAction::SavePng => self.save_png.as_ref(),
            HotkeyAction::OpenFile => self.open_file.as_ref(),
        }
    }

    /// Actions bound to `hk`, in [`HotkeyAction::ALL`] order.
    pub fn actions_for(&self, hk: &Hotkey) -> Vec<HotkeyAction> {
        HotkeyAction::ALL
            .iter()
            .copied()
            .filter(|a| self.get(*a) == Some(hk))
            .collect()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HotkeyAction {
    FitView,
    ClearSelection,
    ToggleColorMode,
    ControlsPanel,
    DetailPanel,
    SavePng,
    OpenFile,
}

impl HotkeyAction {
    pub const ALL: &'static [HotkeyAction] = &[
        HotkeyAction::FitView,
        HotkeyAction::ClearSelection,
        HotkeyAction::ToggleColorMode,
        HotkeyAction::ControlsPanel,
        HotkeyAction::DetailPanel,
        HotkeyAction::SavePng,
        HotkeyAction::OpenFile,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            HotkeyAction::FitView => "Fit view",
            HotkeyAction::ClearSelection => "Clear selection",
            HotkeyAction::ToggleColorMode => "Toggle color mode",
            HotkeyAction::ControlsPanel => "Controls",
            HotkeyAction::DetailPanel => "Details",
            HotkeyAction::SavePng => "Save PNG",
            HotkeyAction::OpenFile => "Open JSON",
        }
    }
}

/// "Fit view [F]" style tooltip text.
pub fn format_button_tooltip(description: &str, hotkey: Option<&Hotkey>) -> String {
    match hotkey {
        Some(hk) => format!("{} [{}]", description, hk),
        None => description.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

fn char_from_key(key: egui::Key) -> Option<char> {
    use egui::Key;
    let c = match key {
        Key::A => 'A',
        Key::B => 'B',
        Key::C => 'C',
        Key::D => 'D',
        Key::E => 'E',
        Key::F => 'F',
        Key::G => 'G',
        Key::H => 'H',
        Key::I => 'I',
        Key::J => 'J',
        Key::K => 'K',
        Key::L => 'L',
        Key::M => 'M',
        Key::N => 'N',
        Key::O => 'O',
        Key::P => 'P',
        Key::Q => 'Q',
        Key::R => 'R',
        Key::S => 'S',
        Key::T => 'T',
        Key::U => 'U',
        Key::V => 'V',
        Key::W => 'W',
        Key::X => 'X',
        Key::Y => 'Y',
        Key::Z => 'Z',
        Key::Num0 => '0',
        Key::Num1 => '1',
        Key::Num2 => '2',
        Key::Num3 => '3',
        Key::Num4 => '4',
        Key::Num5 => '5',
        Key::Num6 => '6',
        Key::Num7 => '7',
        Key::Num8 => '8',
        Key::Num9 => '9',
        Key::Space => ' ',
        _ => return None,
    };
    Some(c)
}

fn event_to_hotkey(ev: &egui::Event) -> Option<Hotkey> {
    match ev {
        egui::Event::Key {
            key,
            pressed: true,
            repeat: false,
            modifiers,
            ..
        } => char_from_key(*key).map(|c| Hotkey::new(Modifier::from_egui(modifiers), c)),
        _ => None,
    }
}

/// Actions triggered by this frame's key presses. Nothing fires while a text
/// field has keyboard focus.
pub fn detect_hotkey_actions(cfg: &Hotkeys, ctx: &egui::Context) -> Vec<HotkeyAction> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    let events = ctx.input(|i| i.events.clone());
    let mut actions = Vec::new();
    for hk in events.iter().filter_map(event_to_hotkey) {
        for act in cfg.actions_for(&hk) {
            if !actions.contains(&act) {
                actions.push(act);
            }
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let hk: Hotkey = "ctrl+o".parse().unwrap();
        assert_eq!(hk, Hotkey::new(Modifier::Ctrl, 'O'));
        assert_eq!(hk.to_string(), "Ctrl+O");
        let hk: Hotkey = "Shift+Alt+x".parse().unwrap();
        assert_eq!(hk.modifier, Modifier::AltShift);
        assert_eq!("space".parse::<Hotkey>().unwrap().to_string(), "Space");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Hotkey>().is_err());
        assert!("Meta+F".parse::<Hotkey>().is_err());
        assert!("Ctrl+Foo".parse::<Hotkey>().is_err());
    }

    #[test]
    fn default_bindings_are_distinct() {
        let hk = Hotkeys::default();
        for a in HotkeyAction::ALL {
            let bound = hk.get(*a).unwrap();
            assert_eq!(hk.actions_for(bound), vec![*a]);
        }
    }

    #[test]
    fn key_event_maps_with_modifiers() {
        let ev = egui::Event::Key {
            key: egui::Key::O,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::COMMAND,
        };
        assert_eq!(event_to_hotkey(&ev), Some(Hotkey::new(Modifier::Ctrl, 'O')));
    }
}
