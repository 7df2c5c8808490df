//! Selection / UI state controller.
//!
//! [`ExplorerState`] owns the loaded dataset and the session's UI choices
//! (scheme, color mode, point size, cluster filter, hover, selection) and
//! recomputes the derived views whenever one of them changes.

use crate::data::dataset::{Dataset, LabelValue, Point, PointId};
use crate::data::derived::{
    available_cluster_values, cluster_distribution, filter_indices, Bounds, ColorMode,
};
use crate::data::providers::LoadedDataset;
use crate::data::selection::{ClickModifiers, Selection};

/// Scheme name used when the dataset declares no cluster schemes.
pub const FALLBACK_SCHEME: &str = "dbscan";

pub const DEFAULT_POINT_SIZE: f64 = 3.0;

/// Inclusive range for the point-size control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSizeRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PointSizeRange {
    fn default() -> Self {
        Self { min: 1.0, max: 8.0 }
    }
}

impl PointSizeRange {
    pub fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }
}

pub struct ExplorerState {
    dataset: Option<Dataset>,
    source: String,
    scheme: String,
    color_mode: ColorMode,
    point_size: f64,
    point_size_range: PointSizeRange,
    cluster_filter: Option<LabelValue>,
    hover: Option<usize>,
    selection: Selection,

    // Derived, rebuilt by `recompute`.
    displayed: Vec<usize>,
    /// Bumped whenever `displayed` changes.
    displayed_revision: u64,
    available_values: Vec<LabelValue>,
    distribution: Vec<(String, usize)>,
    bounds: Bounds,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new(DEFAULT_POINT_SIZE, PointSizeRange::default())
    }
}

impl ExplorerState {
    pub fn new(point_size: f64, point_size_range: PointSizeRange) -> Self {
        Self {
            dataset: None,
            source: String::new(),
            scheme: FALLBACK_SCHEME.to_string(),
            color_mode: ColorMode::Cluster,
            point_size: point_size_range.clamp(point_size),
            point_size_range,
            cluster_filter: None,
            hover: None,
            selection: Selection::new(),
            displayed: Vec::new(),
            displayed_revision: 0,
            available_values: Vec::new(),
            distribution: Vec::new(),
            bounds: Bounds::default(),
        }
    }

    // ── Dataset ──────────────────────────────────────────────────────────────

    /// Replace the dataset; all derived state and the selection are reset.
    pub fn load(&mut self, loaded: LoadedDataset) {
        let LoadedDataset { dataset, source } = loaded;
        log::info!(
            "dataset '{}' / '{}' with {} points ({})",
            dataset.name,
            dataset.method,
            dataset.positions.len(),
            source
        );
        self.dataset = Some(dataset);
        self.source = source;
        self.cluster_filter = None;
        self.hover = None;
        self.selection.clear();
        self.sync_scheme();
        self.recompute();
        self.displayed_revision += 1;
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn scheme_keys(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(Dataset::scheme_keys)
            .unwrap_or_default()
    }

    /// Cluster coloring needs at least one declared scheme.
    pub fn cluster_enabled(&self) -> bool {
        !self.scheme_keys().is_empty()
    }

    /// Keep the active scheme when still declared, else fall back.
    fn sync_scheme(&mut self) {
        let keys = self.scheme_keys();
        match keys.first() {
            None => {
                self.scheme = FALLBACK_SCHEME.to_string();
                self.color_mode = ColorMode::Score;
            }
            Some(first) => {
                if !keys.contains(&self.scheme) {
                    self.scheme = first.clone();
                }
            }
        }
    }

    // ── UI choices ───────────────────────────────────────────────────────────

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Switch scheme: colors by cluster and drops the filter, whose values
    /// belong to the previous scheme.
    pub fn set_scheme(&mut self, scheme: &str) {
        if !self.scheme_keys().iter().any(|k| k == scheme) {
            log::warn!("ignoring unknown scheme '{}'", scheme);
            return;
        }
        self.scheme = scheme.to_string();
        self.color_mode = ColorMode::Cluster;
        self.cluster_filter = None;
        self.recompute();
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Leaving cluster mode drops the filter.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if mode == ColorMode::Cluster && !self.cluster_enabled() {
            return;
        }
        self.color_mode = mode;
        if mode != ColorMode::Cluster {
            self.cluster_filter = None;
        }
        self.recompute();
    }

    pub fn point_size(&self) -> f64 {
        self.point_size
    }

    pub fn point_size_range(&self) -> PointSizeRange {
        self.point_size_range
    }

    pub fn set_point_size(&mut self, size: f64) {
        self.point_size = self.point_size_range.clamp(size);
    }

    /// Replace the slider range; the current size is re-clamped into it.
    pub fn set_point_size_range(&mut self, range: PointSizeRange) {
        self.point_size_range = range;
        self.point_size = range.clamp(self.point_size);
    }

    pub fn cluster_filter(&self) -> Option<&LabelValue> {
        self.cluster_filter.as_ref()
    }

    pub fn set_cluster_filter(&mut self, filter: Option<LabelValue>) {
        let filter = filter.filter(|f| !f.is_unset());
        if filter == self.cluster_filter {
            return;
        }
        log::debug!(
            "cluster filter {} = {}",
            self.scheme,
            filter.as_ref().map_or("(all)".to_string(), LabelValue::to_string)
        );
        self.cluster_filter = filter;
        self.recompute();
    }

    // ── Derived views ────────────────────────────────────────────────────────

    fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            if !self.displayed.is_empty() {
                self.displayed.clear();
                self.displayed_revision += 1;
            }
            self.available_values.clear();
            self.distribution.clear();
            self.bounds = Bounds::default();
            self.hover = None;
            return;
        };
        let displayed = filter_indices(
            &ds.positions,
            &self.scheme,
            self.color_mode,
            self.cluster_filter.as_ref(),
        );
        if displayed != self.displayed {
            self.hover = None;
            self.displayed_revision += 1;
        }
        self.bounds = Bounds::of(displayed.iter().map(|&i| &ds.positions[i]));
        self.displayed = displayed;
        self.available_values = available_cluster_values(&ds.positions, &self.scheme);
        self.distribution = cluster_distribution(&ds.positions, &self.scheme);
    }

    /// The post-filter point array handed to the engine.
    pub fn displayed_points(&self) -> Vec<&Point> {
        match &self.dataset {
            Some(ds) => self.displayed.iter().map(|&i| &ds.positions[i]).collect(),
            None => Vec::new(),
        }
    }

    pub fn displayed_revision(&self) -> u64 {
        self.displayed_revision
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn available_cluster_values(&self) -> &[LabelValue] {
        &self.available_values
    }

    pub fn cluster_distribution(&self) -> &[(String, usize)] {
        &self.distribution
    }

    // ── Hover / selection ────────────────────────────────────────────────────

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    /// Hover index into the displayed points; out-of-range indices clear it.
    pub fn set_hover(&mut self, index: Option<usize>) {
        self.hover = index.filter(|&i| i < self.displayed.len());
    }

    pub fn hovered_point(&self) -> Option<&Point> {
        let ds = self.dataset.as_ref()?;
        self.hover
            .and_then(|h| self.displayed.get(h))
            .map(|&i| &ds.positions[i])
    }

    fn displayed_id(&self, index: usize) -> Option<PointId> {
        let ds = self.dataset.as_ref()?;
        self.displayed.get(index).map(|&i| ds.positions[i].id)
    }

    /// Apply a click on displayed index `index`. Returns `true` on change.
    pub fn apply_click(&mut self, index: Option<usize>, modifiers: ClickModifiers) -> bool {
        let hit = index.and_then(|i| self.displayed_id(i));
        let changed = self.selection.click(hit, modifiers);
        if changed {
            log::debug!("selection now {:?}", self.selection.ids());
        }
        changed
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    /// Selected items in recency order, resolved against the full dataset so
    /// they survive filter changes.
    pub fn selected_points(&self) -> Vec<&Point> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        self.selection
            .ids()
            .iter()
            .filter_map(|&id| ds.point_by_id(id))
            .collect()
    }

    /// Whether displayed index `index` is part of the selection.
    pub fn is_selected(&self, index: usize) -> bool {
        self.displayed_id(index)
            .is_some_and(|id| self.selection.contains(id))
    }

    /// Engine status plus the data source.
    pub fn status_line(&self, draw_status: &str) -> String {
        if self.source.is_empty() {
            draw_status.to_string()
        } else {
            format!("{} · source: {}", draw_status, self.source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::parse_dataset;
    use serde_json::json;

    fn loaded(v: serde_json::Value) -> LoadedDataset {
        LoadedDataset {
            dataset: parse_dataset(v).unwrap(),
            source: "test".into(),
        }
    }

    fn sample() -> LoadedDataset {
        loaded(json!({
            "cluster_labels": {"kmeans": [0, 1], "dbscan": [-1, 0]},
            "positions": [
                {"id": 10, "x": 0, "y": 0, "cluster_labels": {"kmeans": 0, "dbscan": -1}},
                {"id": 11, "x": 4, "y": 2, "cluster_labels": {"kmeans": 1, "dbscan": 0}},
                {"id": 12, "x": 2, "y": 8, "cluster_labels": {"kmeans": "1", "dbscan": 0}}
            ]
        }))
    }

    #[test]
    fn load_picks_first_scheme_and_cluster_mode() {
        let mut s = ExplorerState::default();
        s.load(sample());
        assert_eq!(s.scheme(), "dbscan");
        assert_eq!(s.color_mode(), ColorMode::Cluster);
        assert_eq!(s.displayed_len(), 3);
    }

    #[test]
    fn no_schemes_falls_back_to_score() {
        let mut s = ExplorerState::default();
        s.load(loaded(json!({"positions": [{"id": 1, "x": 0, "y": 0}]})));
        assert_eq!(s.scheme(), FALLBACK_SCHEME);
        assert_eq!(s.color_mode(), ColorMode::Score);
        s.set_color_mode(ColorMode::Cluster);
        assert_eq!(s.color_mode(), ColorMode::Score);
    }

    #[test]
    fn reload_keeps_declared_scheme() {
        let mut s = ExplorerState::default();
        s.load(sample());
        s.set_scheme("kmeans");
        s.load(sample());
        assert_eq!(s.scheme(), "kmeans");
        s.load(loaded(json!({
            "cluster_labels": {"hdbscan": [0]},
            "positions": [{"id": 1, "x": 0, "y": 0}]
        })));
        assert_eq!(s.scheme(), "hdbscan");
    }

    #[test]
    fn scheme_change_clears_filter_and_forces_cluster_mode() {
        let mut s = ExplorerState::default();
        s.load(sample());
        s.set_cluster_filter(Some(LabelValue::Numeric(0.0)));
        assert_eq!(s.displayed_len(), 2);
        s.set_color_mode(ColorMode::Score);
        assert!(s.cluster_filter().is_none());
        s.set_scheme("kmeans");
        assert_eq!(s.color_mode(), ColorMode::Cluster);
        assert!(s.cluster_filter().is_none());
        s.set_cluster_filter(Some(LabelValue::Numeric(1.0)));
        assert_eq!(s.displayed_len(), 2);
    }

    #[test]
    fn filter_changes_bounds_and_clears_hover() {
        let mut s = ExplorerState::default();
        s.load(sample());
        s.set_hover(Some(2));
        assert_eq!(s.hovered_point().map(|p| p.id), Some(12));
        s.set_cluster_filter(Some(LabelValue::Numeric(-1.0)));
        assert_eq!(s.hover(), None);
        assert_eq!(s.bounds().max_y, 0.0);
    }

    #[test]
    fn selection_survives_filter_and_resets_on_reload() {
        let mut s = ExplorerState::default();
        s.load(sample());
        s.apply_click(Some(1), ClickModifiers::NONE);
        s.apply_click(Some(2), ClickModifiers::APPEND);
        s.set_cluster_filter(Some(LabelValue::Numeric(-1.0)));
        let ids: Vec<i64> = s.selected_points().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert!(!s.is_selected(0));
        s.load(sample());
        assert!(s.selection().is_empty());
    }

    #[test]
    fn point_size_is_clamped() {
        let mut s = ExplorerState::default();
        s.set_point_size(100.0);
        assert_eq!(s.point_size(), 8.0);
        s.set_point_size(0.0);
        assert_eq!(s.point_size(), 1.0);
    }

    #[test]
    fn status_line_appends_source() {
        let mut s = ExplorerState::default();
        assert_eq!(s.status_line("3 points"), "3 points");
        s.load(sample());
        assert_eq!(s.status_line("3 points"), "3 points · source: test");
    }
}
