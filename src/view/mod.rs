//! Render/interaction engine and its building blocks.

pub mod canvas;
pub mod engine;
pub mod gesture;
pub mod transform;

pub use canvas::{Canvas, PixmapCanvas};
pub use engine::{DrawStats, EngineEvent, EngineSettings, RenderParams, ScatterEngine};
pub use transform::{CanvasSize, ScaleRange, ViewTransform};
