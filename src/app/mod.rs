//! Native application shell around the explorer state.
//!
//! | Sub-module       | Responsibility |
//! | ---------------- | -------------- |
//! | [`explorer_app`] | [`ExplorerApp`] (eframe): layout, actions, drag-and-drop, event publishing |
//! | [`export`]       | PNG snapshot of the current view |
//! | [`run`]          | [`run_explorer()`] entry point and icon loading |

pub mod explorer_app;
pub mod export;
mod run;

pub use explorer_app::ExplorerApp;
pub use export::{default_png_name, save_view_png};
pub use run::run_explorer;
