//! Configuration types for the explorer.
//!
//! [`ExplorerConfig`] is assembled in code before launch. [`ViewSettings`]
//! holds the tunables that users may keep in
//! `~/.embedding_explorer/view.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color_scheme::ColorScheme;
use crate::error::ConfigError;
use crate::events::EventController;
use crate::explorer::PointSizeRange;
use crate::hotkeys::Hotkeys;
use crate::view::engine::EngineSettings;
use crate::view::transform::ScaleRange;

pub const CONFIG_DIR_NAME: &str = ".embedding_explorer";

/// `~/.embedding_explorer`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(CONFIG_DIR_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// View settings (YAML)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Initial point radius in logical pixels.
    pub point_size: f64,
    /// Bounds of the point-size slider, `[min, max]`.
    pub point_size_range: [f64; 2],
    /// Scale step per wheel notch.
    pub zoom_factor: f64,
    /// Allowed transform scale, `[min, max]`.
    pub scale_range: [f64; 2],
    /// Pick radius in device pixels.
    pub hit_radius_px: f64,
    /// Margin around the data on fit, logical pixels.
    pub fit_padding_px: f64,
    pub min_draw_radius: f64,
    pub color_scheme: ColorScheme,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            point_size: 3.0,
            point_size_range: [1.0, 8.0],
            zoom_factor: 1.1,
            scale_range: [0.1, 1000.0],
            hit_radius_px: 16.0,
            fit_padding_px: 20.0,
            min_draw_radius: 0.5,
            color_scheme: ColorScheme::default(),
        }
    }
}

fn ordered(pair: [f64; 2]) -> (f64, f64) {
    if pair[0] <= pair[1] {
        (pair[0], pair[1])
    } else {
        (pair[1], pair[0])
    }
}

impl ViewSettings {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("view.yaml"))
    }

    pub fn load_from_path(path: &Path) -> Result<ViewSettings, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&s)?)
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

    /// Settings from the default path, or defaults when the file is absent.
    pub fn load_from_default_path() -> Result<ViewSettings, ConfigError> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(ViewSettings::default());
        }
        Self::load_from_path(&path)
    }

    pub fn point_size_range(&self) -> PointSizeRange {
        let (min, max) = ordered(self.point_size_range);
        PointSizeRange { min, max }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let (min, max) = ordered(self.scale_range);
        let defaults = EngineSettings::default();
        EngineSettings {
            hit_radius: self.hit_radius_px.max(0.0),
            fit_padding: self.fit_padding_px.max(0.0),
            zoom_factor: if self.zoom_factor > 1.0 {
                self.zoom_factor
            } else {
                defaults.zoom_factor
            },
            scale_range: ScaleRange { min, max },
            min_radius: self.min_draw_radius.max(0.0),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature flags
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle individual UI features. All default to enabled.
#[derive(Clone, Debug)]
pub struct FeatureFlags {
    /// Left-hand controls panel (scheme, color mode, filter, distribution).
    pub controls: bool,
    /// Right-hand detail panel for selected items.
    pub detail: bool,
    pub status_line: bool,
    /// Accept `.json` files dropped on the window.
    pub drag_and_drop: bool,
    /// Hover/selection rings on the canvas.
    pub highlights: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            controls: true,
            detail: true,
            status_line: true,
            drag_and_drop: true,
            highlights: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ExplorerConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration for the explorer window.
///
/// | Field          | Purpose |
/// |----------------|---------|
/// | `features`     | Toggle panels and canvas extras |
/// | `view`         | Engine and point-size tunables |
/// | `hotkeys`      | Key bindings (`None` = defaults) |
/// | `events`       | Optional event bus handle |
/// | `image_root`   | Base directory for relative image paths |
#[derive(Clone)]
pub struct ExplorerConfig {
    /// Native window title.
    pub title: String,
    pub native_options: Option<eframe::NativeOptions>,
    pub features: FeatureFlags,
    pub view: ViewSettings,
    pub hotkeys: Option<Hotkeys>,
    pub events: Option<EventController>,
    /// Relative `image_path`s of the initial dataset resolve against this.
    pub image_root: Option<PathBuf>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            title: "Embedding Explorer".to_string(),
            native_options: None,
            features: FeatureFlags::default(),
            view: ViewSettings::default(),
            hotkeys: None,
            events: None,
            image_root: None,
        }
    }
}
