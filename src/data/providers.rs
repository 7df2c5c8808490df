//! Ordered data-source strategies.
//!
//! A [`ProviderChain`] asks each [`DataProvider`] in turn for a dataset and
//! keeps the first one found. Providers are injected by the caller, so the
//! lookup order is explicit and testable without any real environment.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::dataset::{parse_dataset, Dataset};
use crate::error::DatasetError;

/// Environment variable consulted by [`EnvPathProvider::default`].
pub const DATA_ENV_VAR: &str = "EMBEDDINGS_DATA";

/// A dataset together with a human-readable description of where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub source: String,
}

/// One strategy for locating a dataset.
///
/// `Ok(None)` means "nothing here, try the next provider". `Err` means the
/// source exists but could not be ingested.
pub trait DataProvider {
    fn describe(&self) -> String;
    fn provide(&self) -> Result<Option<Dataset>, DatasetError>;
}

/// Dataset handed over in memory by the embedding application.
pub struct InlineProvider {
    value: Value,
}

impl InlineProvider {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl DataProvider for InlineProvider {
    fn describe(&self) -> String {
        "inline".to_string()
    }

    fn provide(&self) -> Result<Option<Dataset>, DatasetError> {
        parse_dataset(self.value.clone()).map(Some)
    }
}

/// JSON document at a fixed path; missing files are skipped.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataProvider for FileProvider {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn provide(&self) -> Result<Option<Dataset>, DatasetError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        Dataset::from_path(&self.path).map(Some)
    }
}

/// JSON document whose path is named by an environment variable.
pub struct EnvPathProvider {
    var: String,
}

impl EnvPathProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    fn resolved(&self) -> Option<PathBuf> {
        std::env::var_os(&self.var)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

impl Default for EnvPathProvider {
    fn default() -> Self {
        Self::new(DATA_ENV_VAR)
    }
}

impl DataProvider for EnvPathProvider {
    fn describe(&self) -> String {
        match self.resolved() {
            Some(p) => format!("env:{}={}", self.var, p.display()),
            None => format!("env:{}", self.var),
        }
    }

    fn provide(&self) -> Result<Option<Dataset>, DatasetError> {
        match self.resolved() {
            Some(path) => Dataset::from_path(&path).map(Some),
            None => Ok(None),
        }
    }
}

/// Providers tried in order until one yields a dataset.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn DataProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline value (if any), then `$EMBEDDINGS_DATA`, then `data.json` and
    /// `sample_data.json` in `dir`.
    pub fn standard(inline: Option<Value>, dir: &Path) -> Self {
        let mut chain = Self::new();
        if let Some(v) = inline {
            chain = chain.with(InlineProvider::new(v));
        }
        chain
            .with(EnvPathProvider::default())
            .with(FileProvider::new(dir.join("data.json")))
            .with(FileProvider::new(dir.join("sample_data.json")))
    }

    pub fn with(mut self, provider: impl DataProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// First dataset found. Failing providers are logged and skipped.
    pub fn load(&self) -> Option<LoadedDataset> {
        for provider in &self.providers {
            let source = provider.describe();
            match provider.provide() {
                Ok(Some(dataset)) => {
                    log::info!(
                        "loaded dataset '{}' ({} points) from {}",
                        dataset.name,
                        dataset.positions.len(),
                        source
                    );
                    return Some(LoadedDataset { dataset, source });
                }
                Ok(None) => log::debug!("no dataset at {}", source),
                Err(e) => log::warn!("skipping {}: {}", source, e),
            }
        }
        None
    }
}

/// Read an uploaded/dropped file; the source is recorded as `upload:<name>`.
pub fn load_from_file(path: &Path) -> Result<LoadedDataset, DatasetError> {
    let dataset = Dataset::from_path(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(LoadedDataset {
        dataset,
        source: format!("upload:{}", name),
    })
}

/// Same as [`load_from_file`] for bytes received without a path (drag-and-drop on web).
pub fn load_from_bytes(name: &str, bytes: &[u8]) -> Result<LoadedDataset, DatasetError> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(LoadedDataset {
        dataset: parse_dataset(value)?,
        source: format!("upload:{}", name),
    })
}
