//! SeaRoute library entry points.
//!
//! This crate exposes helpers to load a maritime lane dataset, build the
//! immutable lane graph, snap arbitrary coordinates onto it, and run
//! shortest-path searches that respect the lane network. Higher-level
//! consumers (the CLI) should only depend on the functions exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod error;
pub mod geo;
pub mod graph;
pub mod locator;
pub mod output;
pub mod path;
pub mod routing;
pub mod spatial;

pub use dataset::{
    default_data_dir, load_lane_graph, read_lane_records, read_node_records, resolve_data_dir,
    DatasetPaths,
};
pub use error::{Error, Result};
pub use geo::{haversine_km, Coordinate, DistanceUnit, EARTH_RADIUS_KM};
pub use graph::{Edge, LaneGraph, LaneRecord, Node, NodeId, NodeRecord};
pub use locator::{LinearScan, NodeLocator, NodeMatch};
pub use output::{Landmark, RouteResult, RouteWaypoint};
pub use path::{find_route, QueryOverlay, SearchBudget, SearchOutcome, Vertex};
pub use routing::{
    nearby_landmarks, plan_route, resolve_location, RouteAlgorithm, RouteEngine, RouteOptions,
    RouteRequest, DEFAULT_MAX_SNAP_DISTANCE_KM,
};
pub use spatial::SpatialIndex;
