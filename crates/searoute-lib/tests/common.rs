#![allow(dead_code)]

use std::path::PathBuf;

use searoute_lib::{load_lane_graph, Coordinate, LaneGraph};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Small graph: a diamond (1-2-4, 1-3-4) with a spur to 5, plus a detached
/// two-node island (10, 11).
pub fn basins_graph() -> LaneGraph {
    load_lane_graph(&fixtures_dir().join("basins")).expect("basins fixture loads")
}

/// Coarse world lane network with an isolated Caspian basin.
pub fn world_graph() -> LaneGraph {
    load_lane_graph(&fixtures_dir().join("world")).expect("world fixture loads")
}

pub fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("valid coordinate")
}

pub fn port(graph: &LaneGraph, name: &str) -> Coordinate {
    let id = graph
        .node_by_name(name)
        .unwrap_or_else(|| panic!("{name} present in fixture"));
    graph.coordinate(id).expect("node has a coordinate")
}
