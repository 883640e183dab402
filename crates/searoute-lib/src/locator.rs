//! Nearest-node snapping.
//!
//! [`NodeLocator`] is the seam between the route planner and whatever
//! structure answers "which lane nodes are closest to this point". The
//! [`LinearScan`] baseline and the KD-tree backed
//! [`SpatialIndex`](crate::spatial::SpatialIndex) must return identical
//! results for identical input.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::{haversine_km, Coordinate};
use crate::graph::{LaneGraph, NodeId};

/// A lane node together with its great-circle distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeMatch {
    pub id: NodeId,
    pub distance_km: f64,
}

impl NodeMatch {
    /// Ascending by distance, ties broken by lowest node id.
    pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance_km
            .total_cmp(&other.distance_km)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Strategy for finding the lane nodes closest to a coordinate.
pub trait NodeLocator: Send + Sync {
    /// Up to `k` nodes ordered by ascending distance, ties by lowest id.
    ///
    /// Returns an empty list for `k == 0` and [`Error::EmptyGraph`] when there
    /// are no nodes to search.
    fn nearest(&self, coordinate: Coordinate, k: usize) -> Result<Vec<NodeMatch>>;

    /// Like [`NodeLocator::nearest`], but fails with
    /// [`Error::SnapDistanceExceeded`] when the closest node lies beyond
    /// `max_distance_km`. Further candidates beyond the limit are dropped.
    fn nearest_within(
        &self,
        coordinate: Coordinate,
        k: usize,
        max_distance_km: Option<f64>,
    ) -> Result<Vec<NodeMatch>> {
        let mut matches = self.nearest(coordinate, k)?;
        let Some(limit) = max_distance_km else {
            return Ok(matches);
        };

        if let Some(closest) = matches.first() {
            if closest.distance_km > limit {
                return Err(Error::SnapDistanceExceeded {
                    latitude: coordinate.latitude(),
                    longitude: coordinate.longitude(),
                    distance_km: closest.distance_km,
                    limit_km: limit,
                });
            }
        }
        matches.retain(|candidate| candidate.distance_km <= limit);
        Ok(matches)
    }
}

/// O(n) reference locator that measures every node.
#[derive(Debug, Clone, Copy)]
pub struct LinearScan<'g> {
    graph: &'g LaneGraph,
}

impl<'g> LinearScan<'g> {
    pub fn new(graph: &'g LaneGraph) -> Self {
        Self { graph }
    }
}

impl NodeLocator for LinearScan<'_> {
    fn nearest(&self, coordinate: Coordinate, k: usize) -> Result<Vec<NodeMatch>> {
        if self.graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut matches: Vec<NodeMatch> = self
            .graph
            .nodes()
            .iter()
            .map(|node| NodeMatch {
                id: node.id,
                distance_km: haversine_km(coordinate, node.coordinate),
            })
            .collect();

        matches.sort_by(NodeMatch::cmp_by_distance);
        matches.truncate(k);
        Ok(matches)
    }
}
