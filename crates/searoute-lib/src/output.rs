use serde::Serialize;

use crate::geo::{Coordinate, DistanceUnit};
use crate::graph::{Node, NodeId};
use crate::locator::NodeMatch;
use crate::routing::RouteAlgorithm;

/// Lane node traversed by a route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteWaypoint {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub coordinate: Coordinate,
}

impl RouteWaypoint {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl From<&Node> for RouteWaypoint {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            region: node.region.clone(),
            coordinate: node.coordinate,
        }
    }
}

/// Named node found near a route coordinate.
///
/// Landmarks are reported separately from [`RouteWaypoint`]s: a landmark is
/// the closest named node to some point of the route and need not lie on it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Landmark {
    pub id: NodeId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub coordinate: Coordinate,
    /// Distance from the route coordinate that selected this landmark.
    pub distance_km: f64,
    /// Whether the landmark is itself one of the route waypoints.
    pub on_route: bool,
}

/// Result of a single route query. The engine keeps no reference to it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteResult {
    /// Total length in `unit`.
    pub distance: f64,
    pub unit: DistanceUnit,
    /// Total length in kilometres, independent of the requested unit.
    pub distance_km: f64,
    pub algorithm: RouteAlgorithm,
    /// Ordered geometry from the origin query point to the destination query point.
    pub path: Vec<Coordinate>,
    /// Lane nodes traversed, in order.
    pub waypoints: Vec<RouteWaypoint>,
    pub origin_snap: NodeMatch,
    pub destination_snap: NodeMatch,
}

impl RouteResult {
    /// Number of lane hops between the first and last waypoint.
    pub fn hop_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Distinct region tags along the waypoints, in first-seen order.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for region in self.waypoints.iter().filter_map(|w| w.region.as_deref()) {
            if !regions.contains(&region) {
                regions.push(region);
            }
        }
        regions
    }

    /// Re-express the same route in another unit.
    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self.distance = unit.from_km(self.distance_km);
        self
    }
}
