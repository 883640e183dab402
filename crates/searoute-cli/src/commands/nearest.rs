//! Nearest command handler: which lane nodes a coordinate would snap to.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use searoute_lib::{Coordinate, NodeLocator, SpatialIndex};

use searoute_cli::output::{NearestEntry, NearestReport, OutputFormat};

use super::load_graph;

/// Arguments for the nearest command.
#[derive(Args, Debug, Clone)]
pub struct NearestCommandArgs {
    /// Query point as `latitude,longitude`.
    #[arg(long, allow_hyphen_values = true)]
    pub at: Coordinate,
    /// Number of nodes to list.
    #[arg(short = 'k', long = "count", default_value_t = 5)]
    pub count: usize,
}

/// Handle the nearest subcommand.
pub fn handle_nearest_command(
    data_dir: Option<&Path>,
    format: OutputFormat,
    args: &NearestCommandArgs,
) -> Result<()> {
    let (_, graph) = load_graph(data_dir)?;
    let index = SpatialIndex::build(&graph);

    let matches = index
        .nearest(args.at, args.count)
        .context("nearest-node lookup failed")?;

    let report = NearestReport {
        at: args.at,
        matches: matches
            .into_iter()
            .filter_map(|found| {
                graph.node(found.id).map(|node| NearestEntry {
                    id: node.id,
                    name: node.name.clone(),
                    region: node.region.clone(),
                    coordinate: node.coordinate,
                    distance_km: found.distance_km,
                })
            })
            .collect(),
    };
    format
        .render_nearest(&mut io::stdout().lock(), &report)
        .context("failed to write nearest-node output")
}
