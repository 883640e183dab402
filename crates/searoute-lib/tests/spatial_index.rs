use searoute_lib::{Coordinate, LaneGraph, LinearScan, NodeLocator, NodeRecord, SpatialIndex};

mod common;

use common::{coord, world_graph};

fn query_points() -> Vec<Coordinate> {
    let mut points = Vec::new();
    for lat in (-85..=85).step_by(17) {
        for lon in (-180..180).step_by(23) {
            points.push(coord(lat as f64, lon as f64));
        }
    }
    points.push(coord(90.0, 0.0));
    points.push(coord(-90.0, 0.0));
    points.push(coord(35.0, 179.999));
    points
}

#[test]
fn index_matches_linear_scan_on_world_fixture() {
    let graph = world_graph();
    let index = SpatialIndex::build(&graph);
    let scan = LinearScan::new(&graph);
    assert_eq!(index.len(), graph.len());

    for point in query_points() {
        for k in [1, 3, 7] {
            assert_eq!(
                index.nearest(point, k).expect("index query"),
                scan.nearest(point, k).expect("scan query"),
                "query {point} k={k}"
            );
        }
    }
}

#[test]
fn index_matches_linear_scan_when_k_exceeds_node_count() {
    let graph = world_graph();
    let index = SpatialIndex::build(&graph);
    let scan = LinearScan::new(&graph);

    for point in [coord(0.0, 0.0), coord(51.0, 3.0), coord(-45.0, 170.0)] {
        for k in [graph.len(), graph.len() + 1, usize::MAX] {
            let indexed = index.nearest(point, k).expect("index query");
            assert_eq!(indexed.len(), graph.len());
            assert_eq!(indexed, scan.nearest(point, k).expect("scan query"));
        }
    }
}

#[test]
fn index_matches_linear_scan_with_stacked_nodes() {
    // A port and many canal waypoints recorded at one position, plus a
    // few neighbours around it.
    let mut nodes: Vec<NodeRecord> = (1..=40)
        .map(|id| NodeRecord::at(id, 29.95, 32.55))
        .collect();
    nodes.push(NodeRecord::at(41, 31.26, 32.3).named("Port Said"));
    nodes.push(NodeRecord::at(42, 27.9, 34.3));
    nodes.push(NodeRecord::at(43, 29.95, 32.55).named("Suez"));
    let graph = LaneGraph::from_records(nodes, Vec::new()).expect("valid graph");

    let index = SpatialIndex::build(&graph);
    let scan = LinearScan::new(&graph);
    assert_eq!(index.len(), 43);

    for point in [coord(29.95, 32.55), coord(30.5, 32.4), coord(28.0, 34.0)] {
        for k in [1, 5, 40, 41, 42, 100] {
            assert_eq!(
                index.nearest(point, k).expect("index query"),
                scan.nearest(point, k).expect("scan query"),
                "query {point} k={k}"
            );
        }
    }
    assert_eq!(index.within_radius(coord(29.95, 32.55), 1.0).len(), 41);
}

#[test]
fn exact_node_position_snaps_at_zero_distance() {
    let graph = world_graph();
    let index = SpatialIndex::build(&graph);

    for node in graph.nodes() {
        let matches = index.nearest(node.coordinate, 1).expect("query");
        assert_eq!(matches[0].id, node.id);
        assert_eq!(matches[0].distance_km, 0.0);
    }
}

#[test]
fn radius_query_returns_sorted_matches_inside_radius() {
    let graph = world_graph();
    let index = SpatialIndex::build(&graph);
    let suez = coord(30.5, 32.4);

    let matches = index.within_radius(suez, 200.0);
    let ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![11, 12]);
    assert!(matches.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    assert!(matches.iter().all(|m| m.distance_km <= 200.0));
}

#[test]
fn snap_limit_is_enforced_by_both_locators() {
    let graph = world_graph();
    let index = SpatialIndex::build(&graph);
    let scan = LinearScan::new(&graph);
    let south_pacific = coord(-50.0, -130.0);

    assert!(index.nearest_within(south_pacific, 1, Some(500.0)).is_err());
    assert!(scan.nearest_within(south_pacific, 1, Some(500.0)).is_err());
    assert_eq!(
        index
            .nearest_within(south_pacific, 2, None)
            .expect("no limit"),
        scan.nearest_within(south_pacific, 2, None).expect("no limit")
    );
}
