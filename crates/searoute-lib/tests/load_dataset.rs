use std::fs;

use searoute_lib::{haversine_km, load_lane_graph, Error};

mod common;

use common::{basins_graph, world_graph};

#[test]
fn world_fixture_loads() {
    let graph = world_graph();
    assert_eq!(graph.len(), 34);
    assert_eq!(graph.edge_count(), 37);

    let basins = graph.basins();
    assert_eq!(basins.len(), 2, "ocean network plus the Caspian");
    assert_eq!(basins[1], vec![31, 32, 33]);
}

#[test]
fn names_resolve_case_insensitively() {
    let graph = world_graph();
    assert_eq!(graph.node_by_name("port said"), Some(12));
    assert_eq!(graph.node_by_name("  ROTTERDAM "), Some(17));
    assert_eq!(graph.node_by_name("Atlantis"), None);

    let suggestions = graph.fuzzy_node_matches("Rotterdm", 3);
    assert_eq!(suggestions.first().map(String::as_str), Some("Rotterdam"));
}

#[test]
fn blank_names_and_regions_are_absent() {
    let graph = world_graph();
    let waypoint = graph.node(8).expect("open ocean waypoint");
    assert!(waypoint.name.is_none());
    assert!(waypoint.region.is_none());

    let malacca = graph.node(6).expect("strait");
    assert_eq!(malacca.name.as_deref(), Some("Strait of Malacca"));
    assert!(malacca.region.is_none());
}

#[test]
fn lane_weights_are_great_circle_lengths() {
    let graph = world_graph();
    for node in graph.nodes() {
        for edge in graph.neighbours(node.id) {
            let target = graph.coordinate(edge.target).expect("target exists");
            let expected = haversine_km(node.coordinate, target);
            assert!(
                (edge.distance_km - expected).abs() < 1e-9,
                "lane {} -> {} stored {} expected {}",
                node.id,
                edge.target,
                edge.distance_km,
                expected
            );
            assert_eq!(graph.edge_weight(edge.target, node.id), Some(edge.distance_km));
        }
    }
}

#[test]
fn antimeridian_lane_is_short() {
    let graph = world_graph();
    let weight = graph.edge_weight(26, 3).expect("north pacific lane");
    assert!(weight < 5_000.0, "lane wrapped the long way: {weight}");
}

#[test]
fn basins_fixture_has_island() {
    let graph = basins_graph();
    assert_eq!(graph.basins(), vec![vec![1, 2, 3, 4, 5], vec![10, 11]]);
}

#[test]
fn dangling_lane_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("nodes.csv"),
        "id,name,latitude,longitude\n1,A,0,0\n2,B,0,1\n",
    )
    .expect("write nodes");
    fs::write(dir.path().join("lanes.csv"), "from,to\n1,2\n2,9\n").expect("write lanes");

    let err = load_lane_graph(dir.path()).expect_err("lane to unknown node");
    assert!(matches!(
        err,
        Error::DanglingEdgeReference {
            from: 2,
            to: 9,
            missing: 9
        }
    ));
}

#[test]
fn out_of_range_coordinate_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("nodes.csv"),
        "id,latitude,longitude\n1,95,0\n",
    )
    .expect("write nodes");
    fs::write(dir.path().join("lanes.csv"), "from,to\n").expect("write lanes");

    let err = load_lane_graph(dir.path()).expect_err("latitude out of range");
    assert!(matches!(err, Error::InvalidCoordinate { .. }));
}

#[test]
fn empty_node_table_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("nodes.csv"), "id,latitude,longitude\n").expect("write nodes");
    fs::write(dir.path().join("lanes.csv"), "from,to\n").expect("write lanes");

    let err = load_lane_graph(dir.path()).expect_err("no nodes");
    assert!(matches!(err, Error::EmptyGraph));
}
