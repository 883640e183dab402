//! Turns solver output into a [`RouteResult`].

use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::{Coordinate, DistanceUnit};
use crate::graph::{LaneGraph, NodeId};
use crate::locator::{NodeLocator, NodeMatch};
use crate::output::{Landmark, RouteResult, RouteWaypoint};
use crate::path::{QueryOverlay, SearchOutcome, Vertex};

use super::RouteAlgorithm;

/// Snap results for both ends of a query.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snaps {
    pub origin: NodeMatch,
    pub destination: NodeMatch,
}

/// Build a route from the solver's vertex chain.
///
/// The total is summed from stored lane and entry-edge weights, then
/// converted to `unit`.
pub(crate) fn assemble_route(
    graph: &LaneGraph,
    overlay: &QueryOverlay,
    outcome: &SearchOutcome,
    unit: DistanceUnit,
    algorithm: RouteAlgorithm,
    snaps: Snaps,
) -> Result<RouteResult> {
    let mut distance_km = 0.0;
    for pair in outcome.vertices.windows(2) {
        let weight = overlay
            .weight(graph, pair[0], pair[1])
            .ok_or_else(|| Error::BrokenPath {
                from: describe(pair[0]),
                to: describe(pair[1]),
            })?;
        distance_km += weight;
    }

    let mut path: Vec<Coordinate> = Vec::with_capacity(outcome.vertices.len());
    let mut waypoints = Vec::new();
    for &vertex in &outcome.vertices {
        if let Vertex::Node(id) = vertex {
            let node = graph.node(id).ok_or_else(|| Error::BrokenPath {
                from: describe(vertex),
                to: describe(vertex),
            })?;
            waypoints.push(RouteWaypoint::from(node));
        }
        let coordinate = overlay
            .coordinate(graph, vertex)
            .ok_or_else(|| Error::BrokenPath {
                from: describe(vertex),
                to: describe(vertex),
            })?;
        if path.last() != Some(&coordinate) {
            path.push(coordinate);
        }
    }

    debug!(
        distance_km,
        waypoints = waypoints.len(),
        points = path.len(),
        "assembled route"
    );

    Ok(RouteResult {
        distance: unit.from_km(distance_km),
        unit,
        distance_km,
        algorithm,
        path,
        waypoints,
        origin_snap: snaps.origin,
        destination_snap: snaps.destination,
    })
}

/// Route for an origin and destination that share their nearest node.
pub(crate) fn zero_length_route(
    graph: &LaneGraph,
    node: NodeId,
    unit: DistanceUnit,
    algorithm: RouteAlgorithm,
    snaps: Snaps,
) -> Result<RouteResult> {
    let node = graph.node(node).ok_or_else(|| Error::BrokenPath {
        from: describe(Vertex::Node(node)),
        to: describe(Vertex::Node(node)),
    })?;
    Ok(RouteResult {
        distance: 0.0,
        unit,
        distance_km: 0.0,
        algorithm,
        path: vec![node.coordinate],
        waypoints: vec![RouteWaypoint::from(node)],
        origin_snap: snaps.origin,
        destination_snap: snaps.destination,
    })
}

/// Named nodes closest to each coordinate of `path`, de-duplicated in order
/// of first appearance.
///
/// Coordinates whose closest named node is further than `max_distance_km`
/// contribute nothing.
pub fn nearby_landmarks(
    graph: &LaneGraph,
    locator: &dyn NodeLocator,
    route: &RouteResult,
    max_distance_km: f64,
) -> Result<Vec<Landmark>> {
    let mut landmarks: Vec<Landmark> = Vec::new();

    for &coordinate in &route.path {
        let Some((node_id, distance_km)) =
            nearest_named(graph, locator, coordinate, max_distance_km)?
        else {
            continue;
        };
        if landmarks.iter().any(|landmark| landmark.id == node_id) {
            continue;
        }
        let Some(node) = graph.node(node_id) else {
            continue;
        };
        let Some(name) = node.name.clone() else {
            continue;
        };
        landmarks.push(Landmark {
            id: node.id,
            name,
            region: node.region.clone(),
            coordinate: node.coordinate,
            distance_km,
            on_route: route.waypoints.iter().any(|waypoint| waypoint.id == node.id),
        });
    }

    Ok(landmarks)
}

fn nearest_named(
    graph: &LaneGraph,
    locator: &dyn NodeLocator,
    coordinate: Coordinate,
    max_distance_km: f64,
) -> Result<Option<(NodeId, f64)>> {
    let mut k = 4usize;
    loop {
        let candidates = locator.nearest(coordinate, k)?;
        for candidate in &candidates {
            if candidate.distance_km > max_distance_km {
                return Ok(None);
            }
            let named = graph
                .node(candidate.id)
                .map(|node| node.name.is_some())
                .unwrap_or(false);
            if named {
                return Ok(Some((candidate.id, candidate.distance_km)));
            }
        }
        if candidates.len() < k {
            return Ok(None);
        }
        k = k.saturating_mul(2);
    }
}

fn describe(vertex: Vertex) -> String {
    match vertex {
        Vertex::Origin => "origin".to_string(),
        Vertex::Destination => "destination".to_string(),
        Vertex::Node(id) => format!("node {id}"),
    }
}
