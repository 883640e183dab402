//! Route command handler for computing sea routes between ports or coordinates.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use searoute_lib::{
    resolve_location, Coordinate, DistanceUnit, Error as RouteError, LaneGraph, RouteAlgorithm,
    RouteEngine, RouteOptions, RouteRequest, SearchBudget, DEFAULT_MAX_SNAP_DISTANCE_KM,
};

use searoute_cli::output::{OutputFormat, RouteReport};

use super::load_graph;

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteCommandArgs {
    /// Origin port name or `latitude,longitude`.
    #[arg(long, allow_hyphen_values = true)]
    pub from: String,
    /// Destination port name or `latitude,longitude`.
    #[arg(long, allow_hyphen_values = true)]
    pub to: String,
    /// Distance unit: km, m, mi, nm or ft.
    #[arg(long, default_value = "km", value_parser = parse_unit)]
    pub unit: DistanceUnit,
    /// Search algorithm: dijkstra or a-star.
    #[arg(long, default_value = "dijkstra", value_parser = parse_algorithm)]
    pub algorithm: RouteAlgorithm,
    /// Number of nearest lane nodes each endpoint may enter through.
    #[arg(long, default_value_t = 1)]
    pub snap_candidates: usize,
    /// Refuse endpoints further than this from any lane node (0 disables the check).
    #[arg(long, default_value_t = DEFAULT_MAX_SNAP_DISTANCE_KM, value_parser = parse_snap_limit)]
    pub max_snap_km: f64,
    /// Abort after settling this many vertices.
    #[arg(long)]
    pub max_iterations: Option<usize>,
    /// Abort the search after this many milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Also list named nodes within this many kilometres of the route.
    #[arg(long, value_name = "KM")]
    pub landmarks: Option<f64>,
}

fn parse_unit(value: &str) -> std::result::Result<DistanceUnit, String> {
    value.parse::<DistanceUnit>().map_err(|err| err.to_string())
}

fn parse_snap_limit(value: &str) -> std::result::Result<f64, String> {
    let km = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid distance '{value}': {err}"))?;
    if km.is_finite() && km >= 0.0 {
        Ok(km)
    } else {
        Err(format!(
            "snap limit must be a finite distance of 0 km or more, got '{value}'"
        ))
    }
}

fn parse_algorithm(value: &str) -> std::result::Result<RouteAlgorithm, String> {
    value.parse::<RouteAlgorithm>()
}

impl RouteCommandArgs {
    /// Convert CLI args into a library request with resolved endpoints.
    pub fn to_request(&self, origin: Coordinate, destination: Coordinate) -> RouteRequest {
        RouteRequest {
            origin,
            destination,
            unit: self.unit,
            options: RouteOptions {
                algorithm: self.algorithm,
                snap_candidates: self.snap_candidates.max(1),
                max_snap_distance_km: (self.max_snap_km > 0.0).then_some(self.max_snap_km),
                budget: SearchBudget {
                    max_iterations: self.max_iterations,
                    time_limit: self.timeout_ms.map(Duration::from_millis),
                },
            },
        }
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    data_dir: Option<&Path>,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let (_, graph) = load_graph(data_dir)?;

    let from_label = endpoint_label(&graph, &args.from);
    let to_label = endpoint_label(&graph, &args.to);
    let origin = resolve_location(&graph, &args.from)
        .map_err(|err| handle_route_failure(args, &from_label, &to_label, err))?;
    let destination = resolve_location(&graph, &args.to)
        .map_err(|err| handle_route_failure(args, &from_label, &to_label, err))?;

    let engine = RouteEngine::new(graph);
    let request = args.to_request(origin, destination);
    let route = engine
        .route(&request)
        .map_err(|err| handle_route_failure(args, &from_label, &to_label, err))?;

    let landmarks = match args.landmarks {
        Some(radius) => engine
            .landmarks(&route, radius)
            .context("failed to collect landmarks along the route")?,
        None => Vec::new(),
    };

    let report = RouteReport {
        from: from_label,
        to: to_label,
        route,
        landmark_radius_km: args.landmarks,
        landmarks,
    };
    format
        .render_route(&mut io::stdout().lock(), &report)
        .context("failed to write route output")
}

/// Canonical node name for port inputs, the raw text otherwise.
fn endpoint_label(graph: &LaneGraph, input: &str) -> String {
    graph
        .node_by_name(input)
        .and_then(|id| graph.node(id))
        .and_then(|node| node.name.clone())
        .unwrap_or_else(|| input.trim().to_string())
}

fn handle_route_failure(
    args: &RouteCommandArgs,
    from: &str,
    to: &str,
    err: RouteError,
) -> anyhow::Error {
    match err {
        RouteError::UnknownNode { name, suggestions } => {
            anyhow::anyhow!(format_unknown_port_message(&name, &suggestions))
        }
        RouteError::NoRouteExists { .. } => anyhow::anyhow!(
            "No route found between {} and {}. The endpoints lie in disconnected basins; \
             run `searoute validate` to list them.",
            from,
            to
        ),
        RouteError::SolverTimeout { settled, reason } => {
            anyhow::anyhow!(format_timeout_message(args, settled, &reason))
        }
        err @ RouteError::SnapDistanceExceeded { .. } => {
            anyhow::anyhow!("{err}. Try a larger --max-snap-km or pass 0 to disable the limit.")
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_port_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown port '{}'.", name);
    match suggestions {
        [] => message.push_str(" Pass a known port name or a `latitude,longitude` pair."),
        [only] => message.push_str(&format!(" Did you mean '{only}'?")),
        many => {
            let joined = many
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!(" Did you mean one of: {}?", joined));
        }
    }
    message
}

fn format_timeout_message(args: &RouteCommandArgs, settled: usize, reason: &str) -> String {
    let mut tips = Vec::new();
    if args.max_iterations.is_some() {
        tips.push("raise --max-iterations");
    }
    if args.timeout_ms.is_some() {
        tips.push("raise --timeout-ms");
    }
    if args.algorithm == RouteAlgorithm::Dijkstra {
        tips.push("use --algorithm a-star");
    }
    format!(
        "Route search stopped after settling {} vertices ({}). Try {}.",
        settled,
        reason,
        tips.join(", ")
    )
}
