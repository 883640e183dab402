//! Validate command handler: load the dataset and summarise its basins.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use searoute_cli::output::{BasinSummary, DatasetReport, OutputFormat};

use super::load_graph;

/// Handle the validate subcommand.
///
/// Loading already rejects malformed data; this reports what was loaded.
/// Largest basins are listed first.
pub fn handle_validate_command(data_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let (dir, graph) = load_graph(data_dir)?;

    let mut basins: Vec<BasinSummary> = graph
        .basins()
        .iter()
        .map(|members| BasinSummary {
            nodes: members.len(),
            example: members
                .iter()
                .filter_map(|&id| graph.node(id))
                .find_map(|node| node.name.clone()),
        })
        .collect();
    basins.sort_by(|a, b| b.nodes.cmp(&a.nodes));

    if basins.len() > 1 {
        warn!(
            basins = basins.len(),
            "lane graph has disconnected basins; routes between them do not exist"
        );
    }

    let report = DatasetReport {
        data_dir: dir.display().to_string(),
        nodes: graph.len(),
        lanes: graph.edge_count(),
        basins,
    };
    format
        .render_dataset(&mut io::stdout().lock(), &report)
        .context("failed to write dataset summary")
}
