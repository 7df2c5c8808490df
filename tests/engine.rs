use embedding_explorer::data::dataset::{LabelValue, Point};
use embedding_explorer::data::derived::{Bounds, ColorMode};
use embedding_explorer::data::selection::ClickModifiers;
use embedding_explorer::view::gesture::PointerInput;
use embedding_explorer::view::hit_test::nearest_point;
use embedding_explorer::view::*;
use egui::Color32;

const EPS: f64 = 1e-9;

fn canvas() -> CanvasSize {
    CanvasSize::new(800.0, 600.0)
}

fn engine_for(points: &[Point]) -> ScatterEngine {
    let mut e = ScatterEngine::default();
    e.resize(canvas(), 1.0);
    e.set_bounds(Bounds::of(points));
    e
}

#[test]
fn round_trip_through_screen_space() {
    let t = ViewTransform {
        scale: 37.5,
        translate_x: -12.0,
        translate_y: 80.25,
    };
    for &(x, y) in &[(0.0, 0.0), (1.5, -2.25), (-100.0, 42.0)] {
        let (sx, sy) = t.world_to_screen(x, y, canvas());
        let (wx, wy) = t.screen_to_world(sx, sy, canvas());
        assert!((wx - x).abs() < EPS && (wy - y).abs() < EPS);
    }
}

#[test]
fn fit_puts_centroid_on_canvas_center() {
    let b = Bounds {
        min_x: 2.0,
        max_x: 10.0,
        min_y: -4.0,
        max_y: 0.0,
    };
    let t = ViewTransform::fit(&b, canvas(), 20.0);
    let (sx, sy) = t.world_to_screen(6.0, -2.0, canvas());
    assert!((sx - 400.0).abs() < EPS);
    assert!((sy - 300.0).abs() < EPS);
}

#[test]
fn zoom_keeps_world_point_under_cursor() {
    let mut t = ViewTransform::default();
    let cursor = (530.0, 140.0);
    let before = t.screen_to_world(cursor.0, cursor.1, canvas());
    t.zoom_at(cursor, 1.1, canvas(), ScaleRange::default());
    let after = t.screen_to_world(cursor.0, cursor.1, canvas());
    assert!((before.0 - after.0).abs() < 1e-6);
    assert!((before.1 - after.1).abs() < 1e-6);
}

#[test]
fn repeated_wheel_respects_scale_range() {
    let pts = vec![Point::new(0, 0.0, 0.0), Point::new(1, 1.0, 1.0)];
    let mut e = engine_for(&pts);
    for _ in 0..500 {
        e.wheel((400.0, 300.0), true);
    }
    assert_eq!(e.transform().scale, e.settings().scale_range.max);
    for _ in 0..1000 {
        e.wheel((400.0, 300.0), false);
    }
    assert_eq!(e.transform().scale, e.settings().scale_range.min);
}

#[test]
fn wide_data_fits_inside_padding_and_zoom_returns_to_fit() {
    let pts = vec![Point::new(0, -10000.0, 0.0), Point::new(1, 10000.0, 0.0)];
    let mut e = engine_for(&pts);
    let fitted = e.transform().scale;
    assert!(fitted < e.settings().scale_range.min);
    let (left, _) = e.transform().world_to_screen(-10000.0, 0.0, canvas());
    let (right, _) = e.transform().world_to_screen(10000.0, 0.0, canvas());
    assert!((left - 20.0).abs() < 1e-6);
    assert!((right - 780.0).abs() < 1e-6);

    for _ in 0..5 {
        e.wheel((400.0, 300.0), false);
    }
    assert!((e.transform().scale - fitted).abs() < EPS);
    for _ in 0..5 {
        e.wheel((400.0, 300.0), true);
    }
    assert!(e.transform().scale > fitted);
    for _ in 0..10 {
        e.wheel((400.0, 300.0), false);
    }
    assert!((e.transform().scale - fitted).abs() < EPS);
}

#[test]
fn tiny_data_fits_inside_padding() {
    let pts = vec![Point::new(0, 0.0, 0.0), Point::new(1, 0.1, 0.05)];
    let mut e = engine_for(&pts);
    let fitted = e.transform().scale;
    assert!(fitted > e.settings().scale_range.max);
    let (left, _) = e.transform().world_to_screen(0.0, 0.0, canvas());
    let (right, _) = e.transform().world_to_screen(0.1, 0.0, canvas());
    assert!((left - 20.0).abs() < 1e-6);
    assert!((right - 780.0).abs() < 1e-6);
    e.wheel((400.0, 300.0), false);
    e.wheel((400.0, 300.0), true);
    assert!((e.transform().scale - fitted).abs() < 1e-6);
}

#[test]
fn hit_test_threshold_and_nearest() {
    let t = ViewTransform::default();
    let c = CanvasSize::new(100.0, 100.0);
    // world (0,0) is the canvas center
    let pts = vec![Point::new(0, 0.0, 0.0), Point::new(1, 10.0, 0.0), Point::new(2, 40.0, 0.0)];
    assert_eq!(nearest_point(&pts, &t, c, (50.0, 50.0), 16.0), Some(0));
    assert_eq!(nearest_point(&pts, &t, c, (57.0, 50.0), 16.0), Some(1));
    assert_eq!(nearest_point(&pts, &t, c, (50.0, 67.0), 16.0), None);
    assert_eq!(nearest_point(&pts[2..], &t, c, (50.0, 50.0), 16.0), None);
}

#[test]
fn drag_pans_and_suppresses_hover() {
    let pts = vec![Point::new(0, 0.0, 0.0)];
    let refs: Vec<&Point> = pts.iter().collect();
    let mut e = engine_for(&pts);
    e.drain_events();
    let before = *e.transform();
    e.pointer(PointerInput::Down { x: 400.0, y: 300.0 }, &refs);
    assert!(e.is_dragging());
    e.pointer(PointerInput::Move { x: 420.0, y: 310.0 }, &refs);
    e.pointer(PointerInput::Up, &refs);
    assert!(!e.is_dragging());
    assert_eq!(e.transform().translate_x - before.translate_x, 20.0);
    let events = e.drain_events();
    assert!(events.contains(&EngineEvent::Panned));
    assert!(!events.iter().any(|ev| matches!(ev, EngineEvent::HoverChanged(_))));
}

#[test]
fn click_reports_modifiers_and_hit() {
    let pts = vec![Point::new(0, -1.0, 0.0), Point::new(1, 1.0, 0.0)];
    let refs: Vec<&Point> = pts.iter().collect();
    let mut e = engine_for(&pts);
    e.drain_events();
    let pos = e.transform().world_to_screen(-1.0, 0.0, e.canvas_size());
    let mods = ClickModifiers {
        append: true,
        range: true,
    };
    assert_eq!(e.click(pos, mods, &refs), Some(0));
    assert_eq!(
        e.drain_events(),
        vec![EngineEvent::Clicked {
            index: Some(0),
            modifiers: mods
        }]
    );
}

#[test]
fn offscreen_draw_uses_cluster_colors() {
    let pts = vec![Point::new(0, 0.0, 0.0).with_label("k", LabelValue::Numeric(-1.0))];
    let refs: Vec<&Point> = pts.iter().collect();
    let e = engine_for(&pts);
    let params = RenderParams {
        scheme: "k",
        color_mode: ColorMode::Cluster,
        point_size: 4.0,
    };
    let pixmap = e.render_offscreen(&refs, params, Color32::BLACK).unwrap();
    assert_eq!(
        pixmap.pixel(400, 300),
        Some(embedding_explorer::data::point_color::NOISE_GRAY)
    );
}

#[test]
fn status_reports_count_and_duration() {
    let pts = vec![Point::new(0, 0.0, 0.0), Point::new(1, 1.0, 0.0), Point::new(2, 2.0, 0.0)];
    let refs: Vec<&Point> = pts.iter().collect();
    let mut e = engine_for(&pts);
    assert_eq!(e.status(), "");
    let mut pixmap = PixmapCanvas::new(800, 600, Color32::BLACK).unwrap();
    let params = RenderParams {
        scheme: "k",
        color_mode: ColorMode::Score,
        point_size: 3.0,
    };
    e.draw(&mut pixmap, &refs, params);
    let status = e.status();
    assert!(status.starts_with("3 points · draw "), "{}", status);
    assert!(status.ends_with("ms"));
}
