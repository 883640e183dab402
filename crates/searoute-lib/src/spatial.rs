//! KD-tree spatial index for nearest-node snapping.
//!
//! # Overview
//!
//! The `SpatialIndex` answers the same queries as
//! [`LinearScan`](crate::locator::LinearScan) in O(log n) average time. Each
//! lane node is stored as a point on the unit sphere (k=3), where straight-line
//! chord length grows monotonically with great-circle distance. The tree is
//! only used to pick candidates; final distances are haversine kilometres and
//! the final order is `(distance, id)`, so both locators agree exactly.
//!
//! # Example
//!
//! ```no_run
//! use searoute_lib::{Coordinate, LaneGraph, NodeLocator, SpatialIndex};
//!
//! # fn run(graph: &LaneGraph) -> searoute_lib::Result<()> {
//! let index = SpatialIndex::build(graph);
//! let shanghai = Coordinate::new(31.23, 121.47)?;
//! let closest = index.nearest(shanghai, 2)?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
use crate::graph::{LaneGraph, NodeId};
use crate::locator::{NodeLocator, NodeMatch};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Relative widening applied to the k-th squared chord when collecting ties.
const CHORD_SLACK: f64 = 1e-9;

/// Absolute widening so exact hits (chord 0) still collect coincident nodes.
const CHORD_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
struct IndexNode {
    id: NodeId,
    coordinate: Coordinate,
}

/// Precomputed spatial index over the nodes of a [`LaneGraph`].
///
/// Nodes sharing an exact position are stored under a single tree point, so
/// any number of coincident waypoints can be indexed.
pub struct SpatialIndex {
    /// KD-tree over distinct unit vectors. Items are positions in `points`.
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    /// Nodes at each distinct tree point.
    points: Vec<Vec<IndexNode>>,
    node_count: usize,
}

impl SpatialIndex {
    /// Build a spatial index from every node of the graph.
    pub fn build(graph: &LaneGraph) -> Self {
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut points: Vec<Vec<IndexNode>> = Vec::new();
        let mut by_position: HashMap<[u64; 3], usize> = HashMap::new();

        for node in graph.nodes() {
            let vector = node.coordinate.unit_vector();
            let key = vector.map(f64::to_bits);
            let slot = *by_position.entry(key).or_insert_with(|| {
                tree.add(&vector, points.len());
                points.push(Vec::new());
                points.len() - 1
            });
            points[slot].push(IndexNode {
                id: node.id,
                coordinate: node.coordinate,
            });
        }

        let node_count = graph.len();
        info!(
            node_count,
            distinct_points = points.len(),
            "built spatial index"
        );

        Self {
            tree,
            points,
            node_count,
        }
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.node_count
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Find all nodes within `radius_km` of a point.
    ///
    /// Returns matches sorted by distance, ties by lowest id.
    pub fn within_radius(&self, coordinate: Coordinate, radius_km: f64) -> Vec<NodeMatch> {
        if radius_km < 0.0 || self.is_empty() {
            return Vec::new();
        }

        let angle = radius_km / EARTH_RADIUS_KM;
        let chord = if angle >= std::f64::consts::PI {
            2.0
        } else {
            2.0 * (angle / 2.0).sin()
        };
        let squared = chord * chord * (1.0 + CHORD_SLACK) + CHORD_EPSILON;

        let mut matches: Vec<NodeMatch> = self
            .collect(coordinate, squared)
            .into_iter()
            .filter(|candidate| candidate.distance_km <= radius_km)
            .collect();
        matches.sort_by(NodeMatch::cmp_by_distance);
        matches
    }

    fn collect(&self, coordinate: Coordinate, squared_chord: f64) -> Vec<NodeMatch> {
        self.tree
            .within::<SquaredEuclidean>(&coordinate.unit_vector(), squared_chord)
            .into_iter()
            .flat_map(|neighbour| self.points[neighbour.item].iter())
            .map(|node| NodeMatch {
                id: node.id,
                distance_km: haversine_km(coordinate, node.coordinate),
            })
            .collect()
    }
}

impl NodeLocator for SpatialIndex {
    fn nearest(&self, coordinate: Coordinate, k: usize) -> Result<Vec<NodeMatch>> {
        if self.is_empty() {
            return Err(Error::EmptyGraph);
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        // Every tree point holds at least one node, so the k nearest points
        // always cover the k nearest nodes.
        let query = coordinate.unit_vector();
        let points = k.min(self.points.len());
        let initial = self.tree.nearest_n::<SquaredEuclidean>(&query, points);
        let Some(furthest) = initial.last() else {
            return Ok(Vec::new());
        };

        // Re-query out to the k-th chord so every node tied with the boundary
        // competes on (haversine, id) rather than on tree visiting order.
        let squared = furthest.distance * (1.0 + CHORD_SLACK) + CHORD_EPSILON;
        let mut matches = self.collect(coordinate, squared);
        matches.sort_by(NodeMatch::cmp_by_distance);
        matches.truncate(k);
        Ok(matches)
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("node_count", &self.node_count)
            .field("distinct_points", &self.points.len())
            .finish()
    }
}
