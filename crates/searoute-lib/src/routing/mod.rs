//! Route planning module for maritime pathfinding.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*)
//! - [`RouteOptions`] - Snapping and search settings for one query
//! - [`RouteRequest`] - Origin/destination pair plus output unit
//! - [`plan_route`] - Main entry point for computing routes
//! - [`resolve_location`] - Port name or `lat,lon` text to a coordinate
//! - [`RouteEngine`] - Shareable graph + spatial index bundle
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use searoute_lib::{load_lane_graph, RouteEngine, RouteRequest};
//!
//! let engine = RouteEngine::new(load_lane_graph(Path::new("data/lanes"))?);
//! let request = RouteRequest::from_degrees(31.23, 121.47, 32.08, -81.09)?;
//! let route = engine.route(&request)?;
//! println!("{:.0} {}", route.distance, route.unit);
//! ```

mod assembler;

pub use assembler::nearby_landmarks;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::{Coordinate, DistanceUnit};
use crate::graph::LaneGraph;
use crate::locator::NodeLocator;
use crate::output::{Landmark, RouteResult};
use crate::path::{find_route, QueryOverlay, SearchBudget};
use crate::spatial::SpatialIndex;

use assembler::{assemble_route, zero_length_route, Snaps};

/// Default limit on how far a query point may be from its nearest lane node.
pub const DEFAULT_MAX_SNAP_DISTANCE_KM: f64 = 2_000.0;

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (uniform-cost search).
    #[default]
    Dijkstra,
    /// A* search guided by great-circle distance to the destination.
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "a-star" | "astar" | "a_star" => Ok(RouteAlgorithm::AStar),
            other => Err(format!("unknown algorithm '{other}'")),
        }
    }
}

/// Snapping and search settings applied to a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOptions {
    pub algorithm: RouteAlgorithm,
    /// Number of nearest lane nodes each query point is linked to.
    pub snap_candidates: usize,
    /// Refuse to snap further than this many kilometres (`None` disables the check).
    pub max_snap_distance_km: Option<f64>,
    pub budget: SearchBudget,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            algorithm: RouteAlgorithm::default(),
            snap_candidates: 1,
            max_snap_distance_km: Some(DEFAULT_MAX_SNAP_DISTANCE_KM),
            budget: SearchBudget::unlimited(),
        }
    }
}

/// Route query between two validated coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub unit: DistanceUnit,
    pub options: RouteOptions,
}

impl RouteRequest {
    /// Request with default options and kilometre output.
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            unit: DistanceUnit::default(),
            options: RouteOptions::default(),
        }
    }

    /// Validate raw degrees and build a request.
    pub fn from_degrees(
        origin_lat: f64,
        origin_lon: f64,
        destination_lat: f64,
        destination_lon: f64,
    ) -> Result<Self> {
        Ok(Self::new(
            Coordinate::new(origin_lat, origin_lon)?,
            Coordinate::new(destination_lat, destination_lon)?,
        ))
    }

    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.options.algorithm = algorithm;
        self
    }
}

/// Interpret `input` as `"latitude,longitude"` or, failing that, as a node name.
///
/// Unknown names fail with [`Error::UnknownNode`] carrying close matches.
/// Text that parses as numbers but lies out of range stays an
/// [`Error::InvalidCoordinate`].
pub fn resolve_location(graph: &LaneGraph, input: &str) -> Result<Coordinate> {
    match input.parse::<Coordinate>() {
        Ok(coordinate) => Ok(coordinate),
        Err(Error::CoordinateParse { .. }) => graph
            .node_by_name(input)
            .and_then(|id| graph.coordinate(id))
            .ok_or_else(|| Error::UnknownNode {
                name: input.trim().to_string(),
                suggestions: graph.fuzzy_node_matches(input, 3),
            }),
        Err(other) => Err(other),
    }
}

/// Compute the shortest sea route for a request.
///
/// Both query points are snapped through `locator`, linked to the graph with
/// query-local entry edges, searched, and assembled. `graph` is only read.
pub fn plan_route(
    graph: &LaneGraph,
    locator: &dyn NodeLocator,
    request: &RouteRequest,
) -> Result<RouteResult> {
    let options = &request.options;
    let k = options.snap_candidates.max(1);

    let origin_candidates =
        locator.nearest_within(request.origin, k, options.max_snap_distance_km)?;
    let destination_candidates =
        locator.nearest_within(request.destination, k, options.max_snap_distance_km)?;

    let (Some(&origin), Some(&destination)) =
        (origin_candidates.first(), destination_candidates.first())
    else {
        return Err(Error::EmptyGraph);
    };
    let snaps = Snaps {
        origin,
        destination,
    };

    debug!(
        origin = %request.origin,
        origin_node = origin.id,
        origin_km = origin.distance_km,
        destination = %request.destination,
        destination_node = destination.id,
        destination_km = destination.distance_km,
        "snapped query points"
    );

    if origin.id == destination.id {
        return zero_length_route(graph, origin.id, request.unit, options.algorithm, snaps);
    }

    let overlay = QueryOverlay::new(
        request.origin,
        &origin_candidates,
        request.destination,
        &destination_candidates,
    );
    let outcome = find_route(graph, &overlay, options.algorithm, &options.budget)?;

    assemble_route(
        graph,
        &overlay,
        &outcome,
        request.unit,
        options.algorithm,
        snaps,
    )
}

/// Lane graph plus spatial index, cheap to clone and share across threads.
#[derive(Debug, Clone)]
pub struct RouteEngine {
    graph: Arc<LaneGraph>,
    index: Arc<SpatialIndex>,
}

impl RouteEngine {
    pub fn new(graph: LaneGraph) -> Self {
        Self::from_shared(Arc::new(graph))
    }

    /// Build the spatial index for an already shared graph.
    pub fn from_shared(graph: Arc<LaneGraph>) -> Self {
        let index = Arc::new(SpatialIndex::build(&graph));
        Self { graph, index }
    }

    pub fn graph(&self) -> &LaneGraph {
        &self.graph
    }

    pub fn locator(&self) -> &SpatialIndex {
        &self.index
    }

    /// Run [`plan_route`] against the shared graph and index.
    pub fn route(&self, request: &RouteRequest) -> Result<RouteResult> {
        plan_route(&self.graph, self.index.as_ref(), request)
    }

    /// Named nodes near the route geometry, see [`nearby_landmarks`].
    pub fn landmarks(&self, route: &RouteResult, max_distance_km: f64) -> Result<Vec<Landmark>> {
        nearby_landmarks(&self.graph, self.index.as_ref(), route, max_distance_km)
    }
}
