// One module per subcommand; main.rs only parses and dispatches.

pub mod nearest;
pub mod route;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use searoute_lib::{load_lane_graph, resolve_data_dir, LaneGraph};

/// Resolve the dataset directory and load the lane graph from it.
pub fn load_graph(data_dir: Option<&Path>) -> Result<(PathBuf, LaneGraph)> {
    let dir = resolve_data_dir(data_dir).context("failed to resolve the lane dataset directory")?;
    let graph = load_lane_graph(&dir)
        .with_context(|| format!("failed to load lane dataset from {}", dir.display()))?;
    Ok((dir, graph))
}
