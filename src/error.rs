//! Error types for dataset ingestion and configuration files.

use std::path::PathBuf;

use thiserror::Error;

/// Structural failures while ingesting a dataset document.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("JSON root must be an object")]
    NotAnObject,
    #[error("JSON must have a positions[] array")]
    MissingPositions,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("positions[] could not be read: {0}")]
    InvalidPositions(#[source] serde_json::Error),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while loading or saving YAML settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME env var not set")]
    NoHome,
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures while rendering the scatter view to an image file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("canvas has zero size")]
    EmptyCanvas,
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
