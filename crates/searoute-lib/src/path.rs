use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::{haversine_km, Coordinate};
use crate::graph::{Edge, LaneGraph, NodeId};
use crate::locator::NodeMatch;
use crate::routing::RouteAlgorithm;

/// Check the wall clock once every 64 settled vertices.
const CLOCK_CHECK_MASK: usize = 0x3F;

/// Search vertex: a lane node or one of the two query-local endpoints.
///
/// The derived order (`Origin < Node(..) < Destination`, nodes by id) is the
/// tie-breaker when two queue entries share a priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vertex {
    Origin,
    Node(NodeId),
    Destination,
}

/// Synthetic entry edges for one query, layered over the shared graph.
///
/// The origin links to its snap candidates and each destination candidate
/// links to the destination. Nothing here is written back to the
/// [`LaneGraph`].
#[derive(Debug, Clone)]
pub struct QueryOverlay {
    origin: Coordinate,
    destination: Coordinate,
    origin_edges: Vec<Edge>,
    destination_edges: Vec<Edge>,
}

impl QueryOverlay {
    /// Build the overlay from snap candidates. Weights are the candidates'
    /// great-circle distances to the query points.
    pub fn new(
        origin: Coordinate,
        origin_candidates: &[NodeMatch],
        destination: Coordinate,
        destination_candidates: &[NodeMatch],
    ) -> Self {
        Self {
            origin,
            destination,
            origin_edges: to_edges(origin_candidates),
            destination_edges: to_edges(destination_candidates),
        }
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Coordinate of a search vertex.
    pub fn coordinate(&self, graph: &LaneGraph, vertex: Vertex) -> Option<Coordinate> {
        match vertex {
            Vertex::Origin => Some(self.origin),
            Vertex::Destination => Some(self.destination),
            Vertex::Node(id) => graph.coordinate(id),
        }
    }

    /// Stored weight of the edge `from -> to` in the overlaid graph.
    pub fn weight(&self, graph: &LaneGraph, from: Vertex, to: Vertex) -> Option<f64> {
        match (from, to) {
            (Vertex::Origin, Vertex::Node(id)) => edge_to(&self.origin_edges, id),
            (Vertex::Node(id), Vertex::Destination) => edge_to(&self.destination_edges, id),
            (Vertex::Node(a), Vertex::Node(b)) => graph.edge_weight(a, b),
            _ => None,
        }
    }

    fn for_each_neighbour(
        &self,
        graph: &LaneGraph,
        vertex: Vertex,
        mut visit: impl FnMut(Vertex, f64),
    ) {
        match vertex {
            Vertex::Origin => {
                for edge in &self.origin_edges {
                    visit(Vertex::Node(edge.target), edge.distance_km);
                }
            }
            Vertex::Node(id) => {
                for edge in graph.neighbours(id) {
                    visit(Vertex::Node(edge.target), edge.distance_km);
                }
                if let Some(weight) = edge_to(&self.destination_edges, id) {
                    visit(Vertex::Destination, weight);
                }
            }
            Vertex::Destination => {}
        }
    }
}

fn to_edges(candidates: &[NodeMatch]) -> Vec<Edge> {
    let mut edges: Vec<Edge> = candidates
        .iter()
        .map(|candidate| Edge {
            target: candidate.id,
            distance_km: candidate.distance_km,
        })
        .collect();
    edges.sort_by_key(|edge| edge.target);
    edges.dedup_by_key(|edge| edge.target);
    edges
}

fn edge_to(edges: &[Edge], target: NodeId) -> Option<f64> {
    edges
        .binary_search_by_key(&target, |edge| edge.target)
        .ok()
        .map(|position| edges[position].distance_km)
}

/// Caller-level bound on a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of vertices that may be settled.
    pub max_iterations: Option<usize>,
    /// Wall-clock limit for the search loop.
    pub time_limit: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    fn exhausted(&self, settled: usize, started: Instant) -> Option<String> {
        if let Some(limit) = self.max_iterations {
            if settled >= limit {
                return Some(format!("iteration limit of {limit} reached"));
            }
        }
        if let Some(limit) = self.time_limit {
            if settled & CLOCK_CHECK_MASK == 0 && started.elapsed() >= limit {
                return Some(format!("time limit of {}ms reached", limit.as_millis()));
            }
        }
        None
    }
}

/// Vertex chain and cost produced by a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Vertices from origin to destination inclusive.
    pub vertices: Vec<Vertex>,
    /// Length of the path in kilometres.
    pub cost_km: f64,
    /// Number of vertices settled before the destination.
    pub settled: usize,
}

/// Find the shortest path from the overlay origin to its destination.
pub fn find_route(
    graph: &LaneGraph,
    overlay: &QueryOverlay,
    algorithm: RouteAlgorithm,
    budget: &SearchBudget,
) -> Result<SearchOutcome> {
    match algorithm {
        RouteAlgorithm::Dijkstra => find_route_dijkstra(graph, overlay, budget),
        RouteAlgorithm::AStar => find_route_a_star(graph, overlay, budget),
    }
}

/// Run Dijkstra's algorithm over the overlaid graph.
pub fn find_route_dijkstra(
    graph: &LaneGraph,
    overlay: &QueryOverlay,
    budget: &SearchBudget,
) -> Result<SearchOutcome> {
    search(graph, overlay, budget, |_| 0.0)
}

/// Run A* search guided by the great-circle distance to the destination.
///
/// Lane weights are great-circle lengths, so this heuristic never
/// overestimates and the result stays optimal.
pub fn find_route_a_star(
    graph: &LaneGraph,
    overlay: &QueryOverlay,
    budget: &SearchBudget,
) -> Result<SearchOutcome> {
    let destination = overlay.destination();
    search(graph, overlay, budget, |vertex| {
        overlay
            .coordinate(graph, vertex)
            .map(|position| haversine_km(position, destination))
            .unwrap_or(0.0)
    })
}

fn search(
    graph: &LaneGraph,
    overlay: &QueryOverlay,
    budget: &SearchBudget,
    heuristic: impl Fn(Vertex) -> f64,
) -> Result<SearchOutcome> {
    let started = Instant::now();
    let mut distances: HashMap<Vertex, f64> = HashMap::new();
    let mut parents: HashMap<Vertex, Vertex> = HashMap::new();
    let mut settled: HashSet<Vertex> = HashSet::new();
    let mut queue = BinaryHeap::new();

    distances.insert(Vertex::Origin, 0.0);
    queue.push(QueueEntry::new(Vertex::Origin, 0.0, heuristic(Vertex::Origin)));

    while let Some(entry) = queue.pop() {
        if settled.contains(&entry.vertex) {
            continue;
        }
        if let Some(reason) = budget.exhausted(settled.len(), started) {
            warn!(settled = settled.len(), %reason, "route search aborted");
            return Err(Error::SolverTimeout {
                settled: settled.len(),
                reason,
            });
        }

        let current = entry.cost.0;
        if entry.vertex == Vertex::Destination {
            debug!(
                settled = settled.len(),
                cost_km = current,
                "route search reached destination"
            );
            return Ok(SearchOutcome {
                vertices: reconstruct_path(&parents, Vertex::Destination),
                cost_km: current,
                settled: settled.len(),
            });
        }
        settled.insert(entry.vertex);

        overlay.for_each_neighbour(graph, entry.vertex, |next, weight| {
            if settled.contains(&next) {
                return;
            }
            let next_cost = current + weight;
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, entry.vertex);
                queue.push(QueueEntry::new(next, next_cost, heuristic(next)));
            }
        });
    }

    debug!(settled = settled.len(), "route search exhausted the basin");
    Err(Error::NoRouteExists {
        origin: overlay.origin().to_string(),
        destination: overlay.destination().to_string(),
    })
}

fn reconstruct_path(parents: &HashMap<Vertex, Vertex>, goal: Vertex) -> Vec<Vertex> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = parents.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    vertex: Vertex,
    cost: FloatOrd,
    priority: FloatOrd,
}

impl QueueEntry {
    fn new(vertex: Vertex, cost: f64, heuristic: f64) -> Self {
        Self {
            vertex,
            cost: FloatOrd(cost),
            priority: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority, then
        // by lowest vertex.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.vertex.cmp(&self.vertex))
            .then_with(|| other.cost.cmp(&self.cost))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
