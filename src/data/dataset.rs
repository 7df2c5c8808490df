//! In-memory dataset model and JSON ingestion.
//!
//! A dataset is loaded wholesale and never mutated afterwards. Only the
//! structural shape of the document is validated ([`parse_dataset`]);
//! individual point fields are decoded leniently so a single malformed
//! point degrades to defaults instead of failing the whole load.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DatasetError;

pub const DEFAULT_NAME: &str = "(unnamed)";
pub const DEFAULT_METHOD: &str = "(unknown)";

/// Stable identity of a positioned item.
pub type PointId = i64;

// ─────────────────────────────────────────────────────────────────────────────
// LabelValue
// ─────────────────────────────────────────────────────────────────────────────

/// Cluster label of a point under one scheme.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LabelValue {
    Numeric(f64),
    Named(String),
    #[default]
    Unset,
}

impl LabelValue {
    /// `-1` and missing labels both mean "no cluster".
    pub fn is_noise(&self) -> bool {
        match self {
            LabelValue::Numeric(n) => *n == -1.0,
            LabelValue::Named(_) => false,
            LabelValue::Unset => true,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, LabelValue::Unset)
    }

    /// String form used for filter equality and distribution keys.
    ///
    /// Numbers print without a trailing `.0`, so `3` and `"3"` share a key.
    /// Returns `None` for [`LabelValue::Unset`].
    pub fn key(&self) -> Option<String> {
        match self {
            LabelValue::Numeric(n) => Some(format_number(*n)),
            LabelValue::Named(s) => Some(s.clone()),
            LabelValue::Unset => None,
        }
    }

    /// Parse a user-entered filter choice: canonical numbers become
    /// [`LabelValue::Numeric`], everything else stays a name.
    pub fn from_choice(text: &str) -> Option<LabelValue> {
        if text.is_empty() {
            return None;
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() && format_number(n) == text => Some(LabelValue::Numeric(n)),
            _ => Some(LabelValue::Named(text.to_string())),
        }
    }

    fn from_json(v: Value) -> LabelValue {
        match v {
            Value::Number(n) => n.as_f64().map_or(LabelValue::Unset, LabelValue::Numeric),
            Value::String(s) => LabelValue::Named(s),
            _ => LabelValue::Unset,
        }
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(k) => write!(f, "{}", k),
            None => write!(f, "(null)"),
        }
    }
}

impl<'de> Deserialize<'de> for LabelValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(LabelValue::from_json(Value::deserialize(d)?))
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Boxes, predictions, metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned box in image pixels, `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox(pub [f64; 4]);

impl BBox {
    pub fn x1(&self) -> f64 {
        self.0[0]
    }
    pub fn y1(&self) -> f64 {
        self.0[1]
    }
    pub fn x2(&self) -> f64 {
        self.0[2]
    }
    pub fn y2(&self) -> f64 {
        self.0[3]
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| format_number(*v)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

fn bbox_from_json(v: &Value) -> Option<BBox> {
    let arr = v.as_array()?;
    if arr.len() != 4 {
        return None;
    }
    let mut out = [0.0; 4];
    for (slot, item) in out.iter_mut().zip(arr) {
        *slot = item.as_f64().filter(|f| f.is_finite())?;
    }
    Some(BBox(out))
}

fn de_bbox<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BBox>, D::Error> {
    Ok(bbox_from_json(&Value::deserialize(d)?))
}

fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(d)?.as_f64().filter(|f| f.is_finite()))
}

fn de_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(Value::deserialize(d)?.as_i64())
}

fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Image ids may be numbers or strings; annotations are keyed by the string form.
fn de_image_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => n.as_f64().map(format_number),
        _ => None,
    })
}

fn de_lenient<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

/// Model prediction attached to a point.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Prediction {
    #[serde(deserialize_with = "de_opt_i64")]
    pub pred_id: Option<i64>,
    #[serde(deserialize_with = "de_opt_string")]
    pub model_name: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    pub category: Option<String>,
    /// Confidence in `[0, 1]`.
    #[serde(deserialize_with = "de_opt_f64")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "de_bbox")]
    pub bbox: Option<BBox>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PointMetadata {
    #[serde(deserialize_with = "de_image_id")]
    pub image_id: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    pub image_name: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    pub image_path: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    pub assessment_uuid: Option<String>,
    #[serde(deserialize_with = "de_lenient")]
    pub prediction: Option<Prediction>,
}

/// Ground-truth box for an image.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Annotation {
    #[serde(deserialize_with = "de_opt_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de_opt_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "de_bbox")]
    pub bbox: Option<BBox>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Point
// ─────────────────────────────────────────────────────────────────────────────

/// A positioned item on the embedding plane.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
    #[serde(default, deserialize_with = "de_lenient")]
    pub cluster_labels: HashMap<String, LabelValue>,
    #[serde(default, deserialize_with = "de_lenient")]
    pub metadata: PointMetadata,
    /// Auxiliary numeric/boolean attributes.
    #[serde(default, deserialize_with = "de_lenient")]
    pub features: BTreeMap<String, Value>,
}

impl Point {
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            cluster_labels: HashMap::new(),
            metadata: PointMetadata::default(),
            features: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, scheme: &str, label: LabelValue) -> Self {
        self.cluster_labels.insert(scheme.to_string(), label);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.metadata
            .prediction
            .get_or_insert_with(Prediction::default)
            .score = Some(score);
        self
    }

    /// Label under `scheme`; `None` when absent or explicitly null.
    pub fn label(&self, scheme: &str) -> Option<&LabelValue> {
        self.cluster_labels.get(scheme).filter(|l| !l.is_unset())
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.metadata.prediction.as_ref()
    }

    pub fn score(&self) -> Option<f64> {
        self.prediction().and_then(|p| p.score)
    }

    /// String-valued feature (e.g. `eval_type`).
    pub fn feature_str(&self, name: &str) -> Option<&str> {
        self.features.get(name).and_then(Value::as_str)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dataset
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub method: String,
    pub description: Option<String>,
    pub categories: Vec<String>,
    /// Scheme name -> possible label values, in declaration order.
    pub cluster_labels: Vec<(String, Vec<LabelValue>)>,
    /// Image id (string form) -> ground-truth boxes.
    pub annotations: HashMap<String, Vec<Annotation>>,
    pub positions: Vec<Point>,
}

impl Dataset {
    pub fn from_json_str(text: &str) -> Result<Dataset, DatasetError> {
        let value: Value = serde_json::from_str(text)?;
        parse_dataset(value)
    }

    pub fn from_path(path: &Path) -> Result<Dataset, DatasetError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Dataset::from_json_str(&text)
    }

    /// Scheme keys in the order the document declares them.
    pub fn scheme_keys(&self) -> Vec<String> {
        self.cluster_labels.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Ground-truth boxes for the image a point belongs to.
    pub fn annotations_for(&self, point: &Point) -> &[Annotation] {
        point
            .metadata
            .image_id
            .as_ref()
            .and_then(|id| self.annotations.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn point_by_id(&self, id: PointId) -> Option<&Point> {
        self.positions.iter().find(|p| p.id == id)
    }
}

fn non_empty_string(v: Option<&Value>, default: &str) -> String {
    match v.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// Validate the document shape and normalise optional fields.
///
/// The root must be an object holding a `positions` array. `name`,
/// `method`, `cluster_labels` and `annotations` fall back to defaults.
pub fn parse_dataset(input: Value) -> Result<Dataset, DatasetError> {
    let Value::Object(mut obj) = input else {
        return Err(DatasetError::NotAnObject);
    };
    let positions = match obj.remove("positions") {
        Some(v @ Value::Array(_)) => v,
        _ => return Err(DatasetError::MissingPositions),
    };
    let positions: Vec<Point> =
        serde_json::from_value(positions).map_err(DatasetError::InvalidPositions)?;

    let cluster_labels = match obj.remove("cluster_labels") {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(scheme, values)| {
                let values = serde_json::from_value(values).unwrap_or_default();
                (scheme, values)
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut annotations: HashMap<String, Vec<Annotation>> = HashMap::new();
    if let Some(Value::Object(map)) = obj.remove("annotations") {
        for (image_id, list) in map {
            let boxes = match list {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<Annotation>(item).ok())
                    .collect(),
                _ => Vec::new(),
            };
            annotations.insert(image_id, boxes);
        }
    }

    let categories = obj
        .remove("categories")
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    Ok(Dataset {
        name: non_empty_string(obj.get("name"), DEFAULT_NAME),
        method: non_empty_string(obj.get("method"), DEFAULT_METHOD),
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        categories,
        cluster_labels,
        annotations,
        positions,
    })
}
