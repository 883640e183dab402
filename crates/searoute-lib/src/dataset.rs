//! Lane dataset discovery and CSV loading.
//!
//! A dataset directory contains two tables:
//!
//! - `nodes.csv`: `id,name,latitude,longitude,region`
//! - `lanes.csv`: `from,to`
//!
//! Headers are matched case-insensitively and accept a few common synonyms
//! (`lat`, `lng`, `country`, `node_a`, ...). The data is read once; nothing in
//! this module refreshes it afterwards.

use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use directories::ProjectDirs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{LaneGraph, LaneRecord, NodeId, NodeRecord};

/// Default filename of the node table.
pub const NODES_FILENAME: &str = "nodes.csv";

/// Default filename of the lane table.
pub const LANES_FILENAME: &str = "lanes.csv";

/// Environment variable overriding the dataset directory.
pub const DATA_DIR_ENV: &str = "SEAROUTE_DATA_DIR";

const NODE_COLUMNS: &[(&str, &[&str])] = &[
    ("id", &["id", "node_id", "nodeid"]),
    ("name", &["name", "port", "port_name", "portname"]),
    ("latitude", &["latitude", "lat"]),
    ("longitude", &["longitude", "lon", "lng", "long"]),
    ("region", &["region", "country", "d_region", "dregion"]),
];

const LANE_COLUMNS: &[(&str, &[&str])] = &[
    ("from", &["from", "node_a", "nodea", "source", "a"]),
    ("to", &["to", "node_b", "nodeb", "target", "b"]),
];

/// Paths to the files that make up a lane dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub nodes: PathBuf,
    pub lanes: PathBuf,
}

impl DatasetPaths {
    /// Standard file layout inside a dataset directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            nodes: dir.join(NODES_FILENAME),
            lanes: dir.join(LANES_FILENAME),
        }
    }

    fn ensure_present(&self) -> Result<()> {
        for path in [&self.nodes, &self.lanes] {
            if !path.is_file() {
                return Err(Error::DatasetNotFound { path: path.clone() });
            }
        }
        Ok(())
    }
}

/// Resolve the default dataset directory using platform-specific project directories.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "searoute", "searoute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join("lanes"))
}

/// Pick the dataset directory: explicit path, then `SEAROUTE_DATA_DIR`, then
/// the platform default.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(value) = env::var_os(DATA_DIR_ENV) {
        if !value.is_empty() {
            debug!(variable = DATA_DIR_ENV, "using dataset directory from environment");
            return Ok(PathBuf::from(value));
        }
    }
    default_data_dir()
}

/// Load and validate the lane graph stored in `dir`.
pub fn load_lane_graph(dir: &Path) -> Result<LaneGraph> {
    let paths = DatasetPaths::in_dir(dir);
    paths.ensure_present()?;

    let nodes = read_node_records(File::open(&paths.nodes)?, &display(&paths.nodes))?;
    let lanes = read_lane_records(File::open(&paths.lanes)?, &display(&paths.lanes))?;

    info!(
        dir = %dir.display(),
        node_rows = nodes.len(),
        lane_rows = lanes.len(),
        "loaded lane dataset"
    );

    LaneGraph::from_records(nodes, lanes)
}

/// Parse node rows from any reader. `source` names the input in errors.
pub fn read_node_records<R: Read>(reader: R, source: &str) -> Result<Vec<NodeRecord>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = map_columns(&headers, NODE_COLUMNS, &["id", "latitude", "longitude"], source)?;

    let mut records = Vec::new();
    let mut row_num: usize = 1;
    for result in csv_reader.records() {
        row_num += 1;
        let record = result?;
        let row = Row {
            record: &record,
            columns: &columns,
            source,
            row: row_num,
        };

        records.push(NodeRecord {
            id: row.parse::<NodeId>("id")?,
            name: row.optional("name"),
            latitude: row.parse::<f64>("latitude")?,
            longitude: row.parse::<f64>("longitude")?,
            region: row.optional("region"),
        });
    }

    Ok(records)
}

/// Parse lane rows from any reader. `source` names the input in errors.
pub fn read_lane_records<R: Read>(reader: R, source: &str) -> Result<Vec<LaneRecord>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = map_columns(&headers, LANE_COLUMNS, &["from", "to"], source)?;

    let mut records = Vec::new();
    let mut row_num: usize = 1;
    for result in csv_reader.records() {
        row_num += 1;
        let record = result?;
        let row = Row {
            record: &record,
            columns: &columns,
            source,
            row: row_num,
        };
        records.push(LaneRecord::new(
            row.parse::<NodeId>("from")?,
            row.parse::<NodeId>("to")?,
        ));
    }

    Ok(records)
}

fn map_columns(
    headers: &StringRecord,
    synonyms: &[(&'static str, &[&str])],
    required: &[&str],
    source: &str,
) -> Result<BTreeMap<&'static str, usize>> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    let mut index_map = BTreeMap::new();
    for (canon, alts) in synonyms {
        if let Some(position) = alts
            .iter()
            .find_map(|alt| normalized.iter().position(|header| header == alt))
        {
            index_map.insert(*canon, position);
        }
    }

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !index_map.contains_key(column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::LaneData {
            file: source.to_string(),
            message: format!(
                "missing required columns: {}. Available: {}",
                missing.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    Ok(index_map)
}

struct Row<'a> {
    record: &'a StringRecord,
    columns: &'a BTreeMap<&'static str, usize>,
    source: &'a str,
    row: usize,
}

impl Row<'_> {
    fn get(&self, field: &str) -> Option<&str> {
        self.columns
            .get(field)
            .and_then(|&index| self.record.get(index))
            .filter(|value| !value.is_empty())
    }

    fn optional(&self, field: &str) -> Option<String> {
        self.get(field).map(str::to_string)
    }

    fn parse<T>(&self, field: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get(field).ok_or_else(|| Error::LaneData {
            file: self.source.to_string(),
            message: format!("missing {} at row {}", field, self.row),
        })?;
        raw.parse::<T>().map_err(|err| Error::LaneData {
            file: self.source.to_string(),
            message: format!("invalid {} '{}' at row {}: {}", field, raw, self.row, err),
        })
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
