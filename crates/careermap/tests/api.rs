//! Integration tests for the public API

use careermap::prelude::*;
use careermap::{compute_layout, generate_route, LayoutEvent, PathRoute, Stage};
use std::sync::{Arc, Mutex};

fn fixture() -> (Vec<Path>, Vec<Position>, Vec<PositionDetail>) {
    let paths = vec![
        Path::new("eng", "Engineering", "#d33"),
        Path::new("design", "Design", "#33d"),
    ];
    let positions = vec![
        Position::new("junior", "Junior"),
        Position::new("senior", "Senior"),
        Position::new("lead", "Lead"),
    ];
    let details = vec![
        PositionDetail::new("e1", "junior", "eng", 1),
        PositionDetail::new("e2", "senior", "eng", 2),
        PositionDetail::new("e3", "lead", "eng", 3),
        PositionDetail::new("d1", "junior", "design", 1),
        PositionDetail::new("d3", "lead", "design", 3),
    ];
    (paths, positions, details)
}

#[test]
fn test_compute_layout_shapes_output() {
    let (paths, positions, details) = fixture();
    let layout = compute_layout(&paths, &positions, &details, &LayoutConfig::default());

    assert_eq!(layout.nodes.len(), 5);
    assert_eq!(layout.paths.len(), 2);
    assert_eq!(layout.paths[1].node_ids, vec!["d1", "d3"]);
    assert_eq!(layout.interchanges().count(), 4);

    let e2 = layout.node("e2").unwrap();
    assert_eq!(e2.path_id, "eng");
    assert_eq!(e2.color, "#d33");
    assert!(!e2.is_interchange);
}

#[test]
fn test_layout_json_shape() {
    let (paths, positions, details) = fixture();
    let layout = compute_layout(&paths, &positions, &details, &LayoutConfig::default());
    let json = serde_json::to_value(&layout).unwrap();

    let node = &json["nodes"][0];
    for key in ["id", "positionId", "pathId", "level", "x", "y", "color", "isInterchange"] {
        assert!(node.get(key).is_some(), "missing {}", key);
    }
    assert!(node.get("sequenceInPath").is_none());
    assert!(json["paths"][0].get("nodeIds").is_some());
    for key in ["minX", "maxX", "minY", "maxY"] {
        assert!(json["bounds"].get(key).is_some(), "missing {}", key);
    }
    assert!(json.get("skipped").is_none());
}

#[test]
fn test_input_document_round_trip_through_engine() {
    let input = LayoutInput::from_json(
        r##"{
            "paths": [{ "id": "eng", "name": "Engineering", "color": "#d33" }],
            "positions": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }],
            "positionDetails": [
                { "id": "x", "positionId": "a", "careerPathId": "eng", "level": 2, "sequenceInPath": 1 },
                { "id": "y", "positionId": "b", "careerPathId": "eng", "level": 1, "sequenceInPath": 2 }
            ],
            "config": { "routeMode": "direct", "someFutureOption": true }
        }"##,
    )
    .unwrap();
    let engine = LayoutEngine::new();
    let layout = engine.compute_input(&input);
    assert_eq!(layout.paths[0].node_ids, vec!["x", "y"]);
    assert_eq!(layout.node("x").unwrap().sequence_in_path, Some(1));
}

#[test]
fn test_generate_route_modes() {
    let (paths, positions, details) = fixture();
    let layout = compute_layout(&paths, &positions, &details, &LayoutConfig::default());
    let eng: Vec<LayoutNode> = layout
        .nodes_for_path("eng")
        .into_iter()
        .cloned()
        .collect();

    let options = RouteOptions::default();
    let direct = generate_route(&eng, RouteMode::Direct, &options);
    assert_eq!(direct.matches('L').count(), 2);
    assert!(!direct.contains('A'));

    let manhattan = generate_route(&eng, RouteMode::Manhattan, &options);
    assert!(manhattan.matches('L').count() >= 2);

    let smooth = generate_route(&eng, RouteMode::Smooth, &options);
    assert!(smooth.starts_with("M "));
    assert!(!smooth.contains("NaN"));
}

#[test]
fn test_engine_routes() {
    let (paths, positions, details) = fixture();
    let engine = LayoutEngine::with_config(LayoutConfig {
        route_mode: RouteMode::Manhattan,
        ..LayoutConfig::default()
    });
    let layout = engine.compute(&paths, &positions, &details);

    let routes: Vec<PathRoute> = engine.route_all(&layout);
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].d, engine.route_path(&layout, "eng").unwrap());

    assert!(engine.route_between(&layout, "e1", "d3").is_ok());
    assert!(matches!(
        engine.route_path(&layout, "nope"),
        Err(LayoutError::UnknownPath { .. })
    ));
}

#[test]
fn test_observer_sees_every_stage() {
    let stages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stages);
    let engine = LayoutEngine::new().with_observer(move |event: &LayoutEvent| {
        if let LayoutEvent::StageCompleted { stage, items } = event {
            sink.lock().unwrap().push((*stage, *items));
        }
    });

    let (paths, positions, details) = fixture();
    engine.compute(&paths, &positions, &details);

    let stages = stages.lock().unwrap();
    assert_eq!(
        *stages,
        vec![
            (Stage::Analyze, 3),
            (Stage::AssignAngles, 2),
            (Stage::PlaceNodes, 5),
            (Stage::ComputeBounds, 5),
        ]
    );
}

#[test]
fn test_bounds_helpers() {
    let (paths, positions, details) = fixture();
    let layout = compute_layout(&paths, &positions, &details, &LayoutConfig::default());
    let bounds = layout.bounds;
    assert!(bounds.width() > 100.0);
    assert!(bounds.height() > 100.0);
    assert!(bounds.contains(bounds.center()));
    assert_eq!(bounds.view_box().split(' ').count(), 4);
}

#[test]
fn test_config_validation() {
    let config = LayoutConfig {
        corner_radius: -1.0,
        ..LayoutConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("cornerRadius"));

    let sanitized = config.sanitized();
    assert_eq!(sanitized.replaced, vec!["cornerRadius"]);
    assert!(sanitized.config.validate().is_ok());
}

#[test]
fn test_public_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LayoutEngine>();
    assert_send_sync::<LayoutResult>();
    assert_send_sync::<LayoutConfig>();
}
