//! Embedding explorer crate root: re-exports and module wiring.
//!
//! An interactive scatter-plot viewer for 2D embeddings of labeled image
//! items, built on egui/eframe:
//! - `data`: dataset model, ingestion, providers, derived state, coloring, selection
//! - `view`: view transform, hit testing, gestures and the [`ScatterEngine`]
//! - `explorer`: UI state shared by the panels ([`ExplorerState`])
//! - `panels`: controls, detail and scatter widgets
//! - `app`: the native window ([`run_explorer`])
//! - `config`, `hotkeys`, `color_scheme`, `events`: settings and the event bus

pub mod app;
pub mod color_scheme;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod explorer;
pub mod hotkeys;
pub mod panels;
pub mod view;

// Public re-exports for a compact external API
pub use app::{run_explorer, ExplorerApp};
pub use color_scheme::ColorScheme;
pub use config::{ExplorerConfig, FeatureFlags, ViewSettings};
pub use data::dataset::{parse_dataset, Dataset, LabelValue, Point, PointId};
pub use data::derived::ColorMode;
pub use data::providers::{load_from_bytes, load_from_file, DataProvider, LoadedDataset, ProviderChain};
pub use error::{ConfigError, DatasetError, ExportError};
pub use events::{EventController, EventFilter, EventKind, ExplorerEvent};
pub use explorer::ExplorerState;
pub use view::engine::{EngineEvent, EngineSettings, ScatterEngine};
