use embedding_explorer::data::dataset::*;
use embedding_explorer::data::derived::*;
use embedding_explorer::data::point_color::*;
use embedding_explorer::data::providers::*;
use embedding_explorer::DatasetError;
use serde_json::json;

#[test]
fn empty_positions_get_defaults() {
    let ds = parse_dataset(json!({"positions": []})).unwrap();
    assert_eq!(ds.name, "(unnamed)");
    assert_eq!(ds.method, "(unknown)");
    assert!(ds.cluster_labels.is_empty());
    assert!(ds.annotations.is_empty());
    assert!(ds.positions.is_empty());
}

#[test]
fn missing_positions_is_structural_error() {
    assert!(matches!(parse_dataset(json!({})), Err(DatasetError::MissingPositions)));
    assert!(matches!(
        parse_dataset(json!({"positions": {"a": 1}})),
        Err(DatasetError::MissingPositions)
    ));
    assert!(matches!(parse_dataset(json!([1, 2])), Err(DatasetError::NotAnObject)));
}

fn labelled() -> Vec<Point> {
    vec![
        Point::new(1, 0.0, 0.0).with_label("k", LabelValue::Numeric(3.0)),
        Point::new(2, 1.0, 0.0).with_label("k", LabelValue::Named("3".into())),
        Point::new(3, 2.0, 0.0).with_label("k", LabelValue::Numeric(-1.0)),
        Point::new(4, 3.0, 0.0),
        Point::new(5, 4.0, 0.0).with_label("k", LabelValue::Numeric(0.0)),
    ]
}

#[test]
fn filter_is_idempotent_and_clearable() {
    let pts = labelled();
    let three = LabelValue::Numeric(3.0);
    let once = filter_indices(&pts, "k", ColorMode::Cluster, Some(&three));
    let kept: Vec<Point> = once.iter().map(|&i| pts[i].clone()).collect();
    let twice = filter_indices(&kept, "k", ColorMode::Cluster, Some(&three));
    assert_eq!(once, vec![0, 1]);
    assert_eq!(twice, vec![0, 1]);

    let all = filter_indices(&pts, "k", ColorMode::Cluster, None);
    assert_eq!(all, (0..pts.len()).collect::<Vec<_>>());
}

#[test]
fn filter_is_ignored_in_score_mode() {
    let pts = labelled();
    let zero = LabelValue::Numeric(0.0);
    assert_eq!(filter_points(&pts, "k", ColorMode::Score, Some(&zero)).len(), 5);
}

#[test]
fn distribution_counts_sum_to_point_count() {
    let pts = labelled();
    let dist = cluster_distribution(&pts, "k");
    let total: usize = dist.iter().map(|(_, c)| c).sum();
    assert_eq!(total, pts.len());
    assert_eq!(dist[0], ("3".to_string(), 2));
    // equal counts ordered by label
    let rest: Vec<&str> = dist[1..].iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(rest, vec!["(null)", "-1", "0"]);
}

#[test]
fn available_values_keep_first_occurrence_order() {
    let vals = available_cluster_values(&labelled(), "k");
    assert_eq!(
        vals,
        vec![
            LabelValue::Numeric(3.0),
            LabelValue::Named("3".into()),
            LabelValue::Numeric(-1.0),
            LabelValue::Numeric(0.0),
        ]
    );
}

#[test]
fn coloring_is_deterministic_and_noise_is_gray() {
    let a = LabelValue::Named("cats".into());
    assert_eq!(label_color(Some(&a)), label_color(Some(&a)));
    assert_eq!(label_color(Some(&LabelValue::Numeric(-1.0))), NOISE_GRAY);
    assert_eq!(label_color(None), NOISE_GRAY);
    assert_ne!(label_color(Some(&LabelValue::Numeric(0.0))), NOISE_GRAY);
}

#[test]
fn bounds_of_empty_set_is_unit_box() {
    let b = Bounds::of(std::iter::empty::<&Point>());
    assert_eq!(b, Bounds::default());
}

#[test]
fn provider_chain_falls_through_to_first_success() {
    let chain = ProviderChain::new()
        .with(FileProvider::new("/no/such/dir/data.json"))
        .with(InlineProvider::new(json!({"name": "inline one", "positions": []})));
    let loaded = chain.load().unwrap();
    assert_eq!(loaded.dataset.name, "inline one");
    assert_eq!(loaded.source, "inline");
}

#[test]
fn invalid_inline_dataset_is_skipped() {
    let chain = ProviderChain::new()
        .with(InlineProvider::new(json!({"nope": true})))
        .with(InlineProvider::new(json!({"positions": []})));
    assert_eq!(chain.load().map(|l| l.dataset.name), Some("(unnamed)".to_string()));
}

#[test]
fn uploaded_bytes_record_file_name() {
    let loaded = load_from_bytes("run.json", br#"{"positions": []}"#).unwrap();
    assert_eq!(loaded.source, "upload:run.json");
    assert!(load_from_bytes("bad.json", b"{").is_err());
}
