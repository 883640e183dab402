use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::{haversine_km, Coordinate};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Numeric identifier for a lane node.
pub type NodeId = i64;

/// Raw node row as supplied by the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub region: Option<String>,
}

impl NodeRecord {
    /// Unnamed node at the given position.
    pub fn at(id: NodeId, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: None,
            latitude,
            longitude,
            region: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Raw undirected lane between two node identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneRecord {
    pub from: NodeId,
    pub to: NodeId,
}

impl LaneRecord {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

/// Maritime waypoint in the lane graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Edge within the lane graph, stored on both endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub distance_km: f64,
}

/// Immutable weighted undirected graph of navigable sea lanes.
///
/// Built once through [`LaneGraph::from_records`]; no method mutates it, so a
/// single instance can be shared between concurrent route queries.
#[derive(Debug, Clone)]
pub struct LaneGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    name_to_id: HashMap<String, NodeId>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
    edge_count: usize,
}

impl LaneGraph {
    /// Validate node and lane records and build the graph.
    ///
    /// Lane weights are the haversine length between endpoints, computed here
    /// once. Parallel lanes collapse into a single edge.
    pub fn from_records(nodes: Vec<NodeRecord>, lanes: Vec<LaneRecord>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut built = Vec::with_capacity(nodes.len());
        for record in nodes {
            let coordinate = Coordinate::new(record.latitude, record.longitude)?;
            built.push(Node {
                id: record.id,
                coordinate,
                name: record.name.filter(|name| !name.trim().is_empty()),
                region: record.region.filter(|region| !region.trim().is_empty()),
            });
        }
        built.sort_by_key(|node| node.id);

        let mut index = HashMap::with_capacity(built.len());
        for (position, node) in built.iter().enumerate() {
            if index.insert(node.id, position).is_some() {
                return Err(Error::DuplicateNode { id: node.id });
            }
        }

        let mut name_to_id = HashMap::new();
        for node in &built {
            if let Some(name) = &node.name {
                name_to_id.entry(normalize_name(name)).or_insert(node.id);
            }
        }

        let mut unique: BTreeMap<(NodeId, NodeId), f64> = BTreeMap::new();
        for lane in &lanes {
            if lane.from == lane.to {
                return Err(Error::SelfLoop { id: lane.from });
            }
            let from = lookup(&built, &index, lane, lane.from)?;
            let to = lookup(&built, &index, lane, lane.to)?;
            let distance = haversine_km(from.coordinate, to.coordinate);

            let key = (lane.from.min(lane.to), lane.from.max(lane.to));
            unique
                .entry(key)
                .and_modify(|existing| {
                    if distance < *existing {
                        *existing = distance;
                    }
                })
                .or_insert(distance);
        }

        let mut adjacency: HashMap<NodeId, Vec<Edge>> =
            built.iter().map(|node| (node.id, Vec::new())).collect();
        for (&(a, b), &distance_km) in &unique {
            adjacency.entry(a).or_default().push(Edge {
                target: b,
                distance_km,
            });
            adjacency.entry(b).or_default().push(Edge {
                target: a,
                distance_km,
            });
        }
        for edges in adjacency.values_mut() {
            edges.sort_by_key(|edge| edge.target);
        }

        let graph = Self {
            nodes: built,
            index,
            name_to_id,
            adjacency,
            edge_count: unique.len(),
        };

        info!(
            nodes = graph.len(),
            lanes = graph.edge_count(),
            collapsed = lanes.len() - graph.edge_count(),
            basins = graph.basins().len(),
            "built lane graph"
        );

        Ok(graph)
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct undirected lanes.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All nodes, ordered by identifier.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    pub fn coordinate(&self, id: NodeId) -> Option<Coordinate> {
        self.node(id).map(|node| node.coordinate)
    }

    /// Return the neighbours for a given node, ordered by target id.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Stored weight of the lane between `a` and `b`, if one exists.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let edges = self.neighbours(a);
        edges
            .binary_search_by_key(&b, |edge| edge.target)
            .ok()
            .map(|position| edges[position].distance_km)
    }

    /// Lookup a node identifier by name, ignoring case and surrounding whitespace.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(&normalize_name(name)).copied()
    }

    /// Suggest node names similar to `name`, best match first.
    pub fn fuzzy_node_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = normalize_name(name);
        let mut scored: Vec<(f64, &str)> = self
            .nodes
            .iter()
            .filter_map(|node| node.name.as_deref())
            .filter_map(|candidate| {
                let score = strsim::jaro_winkler(&needle, &normalize_name(candidate));
                (score >= SUGGESTION_THRESHOLD).then_some((score, candidate))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });
        scored.dedup_by(|a, b| a.1 == b.1);
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }

    /// Connected components ("basins") of the graph.
    ///
    /// Each basin is sorted by node id and basins are ordered by their
    /// smallest member.
    pub fn basins(&self) -> Vec<Vec<NodeId>> {
        let mut seen: HashSet<NodeId> = HashSet::with_capacity(self.nodes.len());
        let mut basins = Vec::new();

        for node in &self.nodes {
            if seen.contains(&node.id) {
                continue;
            }
            let mut basin = Vec::new();
            let mut queue = VecDeque::from([node.id]);
            seen.insert(node.id);
            while let Some(current) = queue.pop_front() {
                basin.push(current);
                for edge in self.neighbours(current) {
                    if seen.insert(edge.target) {
                        queue.push_back(edge.target);
                    }
                }
            }
            basin.sort_unstable();
            basins.push(basin);
        }

        basins
    }
}

fn lookup<'a>(
    nodes: &'a [Node],
    index: &HashMap<NodeId, usize>,
    lane: &LaneRecord,
    id: NodeId,
) -> Result<&'a Node> {
    index
        .get(&id)
        .map(|&position| &nodes[position])
        .ok_or(Error::DanglingEdgeReference {
            from: lane.from,
            to: lane.to,
            missing: id,
        })
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
