//! Pure derivations over the loaded points.
//!
//! Every function here is a total function of its inputs and is simply
//! re-run whenever an input changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::dataset::{LabelValue, Point};

/// Distribution key for points without a label under the active scheme.
pub const NULL_KEY: &str = "(null)";

/// How points are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Cluster,
    Score,
}

impl ColorMode {
    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Cluster => "cluster label",
            ColorMode::Score => "score",
        }
    }
}

/// World-space extents of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -1.0,
            max_x: 1.0,
            min_y: -1.0,
            max_y: 1.0,
        }
    }
}

impl Bounds {
    /// Min/max over `points`; an empty input yields `[-1, 1]` on both axes.
    pub fn of<'a, I>(points: I) -> Bounds
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut b = Bounds {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        let mut any = false;
        for p in points {
            any = true;
            b.min_x = b.min_x.min(p.x);
            b.max_x = b.max_x.max(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_y = b.max_y.max(p.y);
        }
        if any {
            b
        } else {
            Bounds::default()
        }
    }

    pub fn span_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn span_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.max_x + self.min_x) / 2.0,
            (self.max_y + self.min_y) / 2.0,
        )
    }
}

fn keeps(p: &Point, scheme: &str, filter_key: &str) -> bool {
    p.label(scheme).and_then(LabelValue::key).as_deref() == Some(filter_key)
}

/// Indices of the points that survive the cluster filter.
///
/// The filter only applies in [`ColorMode::Cluster`]; comparison is on the
/// string form of the label, so numeric `3` matches `"3"`.
pub fn filter_indices(
    points: &[Point],
    scheme: &str,
    mode: ColorMode,
    filter: Option<&LabelValue>,
) -> Vec<usize> {
    let filter_key = match (mode, filter.and_then(LabelValue::key)) {
        (ColorMode::Cluster, Some(k)) => k,
        _ => return (0..points.len()).collect(),
    };
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| keeps(p, scheme, &filter_key))
        .map(|(i, _)| i)
        .collect()
}

/// Points that survive the cluster filter, in original order.
pub fn filter_points<'a>(
    points: &'a [Point],
    scheme: &str,
    mode: ColorMode,
    filter: Option<&LabelValue>,
) -> Vec<&'a Point> {
    filter_indices(points, scheme, mode, filter)
        .into_iter()
        .map(|i| &points[i])
        .collect()
}

/// Distinct labels under `scheme`, in order of first occurrence.
pub fn available_cluster_values<'a, I>(points: I, scheme: &str) -> Vec<LabelValue>
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut out: Vec<LabelValue> = Vec::new();
    for p in points {
        if let Some(label) = p.label(scheme) {
            if !out.contains(label) {
                out.push(label.clone());
            }
        }
    }
    out
}

/// Point count per label key, largest first; equal counts sort by key.
pub fn cluster_distribution<'a, I>(points: I, scheme: &str) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for p in points {
        let key = p
            .label(scheme)
            .and_then(LabelValue::key)
            .unwrap_or_else(|| NULL_KEY.to_string());
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts() -> Vec<Point> {
        vec![
            Point::new(0, 0.0, 0.0).with_label("s", LabelValue::Numeric(3.0)),
            Point::new(1, 1.0, 5.0).with_label("s", LabelValue::Named("3".into())),
            Point::new(2, -2.0, 1.0).with_label("s", LabelValue::Numeric(1.0)),
            Point::new(3, 4.0, -1.0),
            Point::new(4, 2.0, 2.0).with_label("s", LabelValue::Numeric(-1.0)),
        ]
    }

    #[test]
    fn empty_bounds_default_to_unit_range() {
        let b = Bounds::of(std::iter::empty());
        assert_eq!(b, Bounds::default());
        assert_eq!(b.centroid(), (0.0, 0.0));
    }

    #[test]
    fn bounds_cover_all_points() {
        let p = pts();
        let b = Bounds::of(&p);
        assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (-2.0, 4.0, -1.0, 5.0));
    }

    #[test]
    fn filter_unifies_numeric_and_string_labels() {
        let p = pts();
        let f = LabelValue::Named("3".into());
        assert_eq!(filter_indices(&p, "s", ColorMode::Cluster, Some(&f)), vec![0, 1]);
        let f = LabelValue::Numeric(3.0);
        assert_eq!(filter_indices(&p, "s", ColorMode::Cluster, Some(&f)), vec![0, 1]);
    }

    #[test]
    fn filter_is_idempotent_and_clearable() {
        let p = pts();
        let f = LabelValue::Numeric(1.0);
        let once = filter_points(&p, "s", ColorMode::Cluster, Some(&f));
        let owned: Vec<Point> = once.iter().map(|p| (*p).clone()).collect();
        let twice = filter_points(&owned, "s", ColorMode::Cluster, Some(&f));
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].id, twice[0].id);

        let cleared = filter_points(&p, "s", ColorMode::Cluster, None);
        let ids: Vec<i64> = cleared.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn score_mode_ignores_filter() {
        let p = pts();
        let f = LabelValue::Numeric(1.0);
        assert_eq!(filter_indices(&p, "s", ColorMode::Score, Some(&f)).len(), p.len());
    }

    #[test]
    fn available_values_keep_first_occurrence_order() {
        let p = pts();
        let vals = available_cluster_values(&p, "s");
        assert_eq!(
            vals,
            vec![
                LabelValue::Numeric(3.0),
                LabelValue::Named("3".into()),
                LabelValue::Numeric(1.0),
                LabelValue::Numeric(-1.0),
            ]
        );
    }

    #[test]
    fn distribution_sorted_with_key_tiebreak_and_sums_to_len() {
        let p = pts();
        let d = cluster_distribution(&p, "s");
        assert_eq!(d[0], ("3".to_string(), 2));
        let rest: Vec<&str> = d[1..].iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(rest, vec!["(null)", "-1", "1"]);
        assert_eq!(d.iter().map(|(_, c)| c).sum::<usize>(), p.len());
    }
}
