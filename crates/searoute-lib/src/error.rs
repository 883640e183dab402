use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the SeaRoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a latitude/longitude pair falls outside the valid range.
    #[error("invalid coordinate ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Raised when a coordinate string could not be parsed.
    #[error("could not parse coordinate '{input}'; expected 'latitude,longitude'")]
    CoordinateParse { input: String },

    /// Raised when a lane graph or locator has no nodes.
    #[error("lane graph contains no nodes")]
    EmptyGraph,

    /// Raised when a lane references a node that was never declared.
    #[error("lane {from} -> {to} references unknown node {missing}")]
    DanglingEdgeReference {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// Raised when two node records share an identifier.
    #[error("duplicate node id {id}")]
    DuplicateNode { id: NodeId },

    /// Raised when a lane connects a node to itself.
    #[error("lane connects node {id} to itself")]
    SelfLoop { id: NodeId },

    /// Raised when origin and destination lie in disconnected basins.
    #[error("no sea route exists between {origin} and {destination}")]
    NoRouteExists { origin: String, destination: String },

    /// Raised when a configured search budget ran out before completion.
    #[error("route search aborted after settling {settled} vertices ({reason})")]
    SolverTimeout { settled: usize, reason: String },

    /// Raised when a solved path uses an edge the overlaid graph does not contain.
    #[error("solved path uses a missing lane between {from} and {to}")]
    BrokenPath { from: String, to: String },

    /// Raised when the closest lane node is further away than the configured limit.
    #[error("nearest lane node to ({latitude}, {longitude}) is {distance_km:.1} km away, beyond the {limit_km:.1} km snapping limit")]
    SnapDistanceExceeded {
        latitude: f64,
        longitude: f64,
        distance_km: f64,
        limit_km: f64,
    },

    /// Raised when a node name could not be found in the graph.
    #[error("unknown port or node name: {name}{}", format_suggestions(.suggestions))]
    UnknownNode {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a distance unit label is not recognised.
    #[error("unsupported distance unit '{unit}'; expected one of km, m, mi, nm, ft")]
    UnsupportedUnit { unit: String },

    /// Raised when a lane dataset file contains malformed rows or headers.
    #[error("invalid lane data in {file}: {message}")]
    LaneData { file: String, message: String },

    /// Raised when the platform data directory could not be resolved.
    #[error("failed to resolve project directories for the lane dataset")]
    ProjectDirsUnavailable,

    /// Raised when a dataset file is missing.
    #[error("lane dataset file not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
