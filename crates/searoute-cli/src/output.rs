//! Output formatting for route, snapping and dataset reports.

use std::io::{self, Write};

use serde::Serialize;

use searoute_lib::{Coordinate, Landmark, NodeId, RouteResult, RouteWaypoint};

use crate::terminal::{format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-friendly listing with totals.
    #[default]
    Text,
    /// One waypoint per line with `+`/`|`/`-` prefixes.
    Basic,
    /// Pretty-printed JSON.
    Json,
}

/// A computed route plus the labels the user asked for.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub route: RouteResult,
    /// Radius used for the landmark lookup, when one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark_radius_km: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,
}

/// Lane nodes nearest to a query point.
#[derive(Debug, Clone, Serialize)]
pub struct NearestReport {
    pub at: Coordinate,
    pub matches: Vec<NearestEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearestEntry {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub coordinate: Coordinate,
    pub distance_km: f64,
}

/// Summary of a loaded lane dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub data_dir: String,
    pub nodes: usize,
    pub lanes: usize,
    pub basins: Vec<BasinSummary>,
}

/// One connected component of the lane graph.
#[derive(Debug, Clone, Serialize)]
pub struct BasinSummary {
    pub nodes: usize,
    /// First named node of the basin, for orientation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl OutputFormat {
    pub fn render_route<W: Write>(&self, out: &mut W, report: &RouteReport) -> io::Result<()> {
        match self {
            OutputFormat::Text => render_route_text(out, report, ColorPalette::detect()),
            OutputFormat::Basic => render_route_basic(out, report),
            OutputFormat::Json => render_json(out, report),
        }
    }

    pub fn render_nearest<W: Write>(&self, out: &mut W, report: &NearestReport) -> io::Result<()> {
        match self {
            OutputFormat::Text => render_nearest_text(out, report, ColorPalette::detect()),
            OutputFormat::Basic => {
                for entry in &report.matches {
                    writeln!(out, "{} {:.3}", entry.id, entry.distance_km)?;
                }
                Ok(())
            }
            OutputFormat::Json => render_json(out, report),
        }
    }

    pub fn render_dataset<W: Write>(&self, out: &mut W, report: &DatasetReport) -> io::Result<()> {
        match self {
            OutputFormat::Text | OutputFormat::Basic => render_dataset_text(out, report),
            OutputFormat::Json => render_json(out, report),
        }
    }
}

/// Print the CLI banner.
pub fn print_logo() {
    let p = ColorPalette::detect();
    println!(
        "{}~~~ searoute ~~~ shortest sea-lane routes ~~~{}",
        p.blue, p.reset
    );
}

/// Print the footer with elapsed time.
pub fn print_footer(elapsed: std::time::Duration) {
    let p = ColorPalette::detect();
    let elapsed_ms = elapsed.as_millis();
    let time_str = if elapsed_ms < 1000 {
        format!("{}ms", elapsed_ms)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    };

    println!("\n{}Completed in {}{}", p.gray, time_str, p.reset);
}

fn render_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

fn waypoint_label(waypoint: &RouteWaypoint) -> String {
    match &waypoint.name {
        Some(name) => name.clone(),
        None => format!("{} #{}", waypoint.display_name(), waypoint.id),
    }
}

fn format_distance(value: f64) -> String {
    format_with_separators(value.max(0.0).round() as u64)
}

/// Render a route in text format.
pub fn render_route_text<W: Write>(
    out: &mut W,
    report: &RouteReport,
    p: ColorPalette,
) -> io::Result<()> {
    let route = &report.route;
    writeln!(
        out,
        "Route from {} to {} ({} hops; algorithm: {}):",
        report.from,
        report.to,
        route.hop_count(),
        route.algorithm
    )?;

    let last = route.waypoints.len().saturating_sub(1);
    for (i, waypoint) in route.waypoints.iter().enumerate() {
        let (tag_color, tag) = if i == 0 {
            (p.tag_origin, "ORIG")
        } else if i == last {
            (p.tag_destination, "DEST")
        } else {
            (p.tag_waypoint, "WAYP")
        };
        let region = waypoint
            .region
            .as_deref()
            .map(|region| format!(" {}[{}]{}", p.cyan, region, p.reset))
            .unwrap_or_default();
        writeln!(
            out,
            " {tag_color}{tag}{reset} {}{}{reset}{region} {}({}){reset}",
            p.white_bold,
            waypoint_label(waypoint),
            p.gray,
            waypoint.coordinate,
            reset = p.reset,
        )?;
    }

    writeln!(
        out,
        "\nTotal distance: {}{} {}{}",
        p.green,
        format_distance(route.distance),
        route.unit,
        p.reset
    )?;

    let regions = route.regions();
    if !regions.is_empty() {
        writeln!(out, "Regions: {}", regions.join(", "))?;
    }

    for (label, snap) in [
        ("Origin", route.origin_snap),
        ("Destination", route.destination_snap),
    ] {
        if snap.distance_km >= 0.05 {
            writeln!(
                out,
                "{}{} snapped to node {} ({:.1} km away){}",
                p.gray, label, snap.id, snap.distance_km, p.reset
            )?;
        }
    }

    if let Some(radius) = report.landmark_radius_km {
        writeln!(out, "\nLandmarks within {} km:", format_distance(radius))?;
        if report.landmarks.is_empty() {
            writeln!(out, " (none)")?;
        }
        for landmark in &report.landmarks {
            let region = landmark
                .region
                .as_deref()
                .map(|region| format!(" [{region}]"))
                .unwrap_or_default();
            let position = if landmark.on_route { "on route" } else { "nearby" };
            writeln!(
                out,
                " * {}{region} {} km ({position})",
                landmark.name,
                format_distance(landmark.distance_km)
            )?;
        }
    }

    Ok(())
}

/// Render a route in basic path format.
///
/// Uses `+`/`|`/`-` prefixes for first/middle/last waypoints.
pub fn render_route_basic<W: Write>(out: &mut W, report: &RouteReport) -> io::Result<()> {
    let route = &report.route;
    let len = route.waypoints.len();
    for (i, waypoint) in route.waypoints.iter().enumerate() {
        let prefix = if i == 0 {
            '+'
        } else if i + 1 == len {
            '-'
        } else {
            '|'
        };
        writeln!(out, "{} {}", prefix, waypoint_label(waypoint))?;
    }
    writeln!(out, "distance: {:.2} {}", route.distance, route.unit)
}

fn render_nearest_text<W: Write>(
    out: &mut W,
    report: &NearestReport,
    p: ColorPalette,
) -> io::Result<()> {
    writeln!(out, "Nearest lane nodes to {}:", report.at)?;
    for (rank, entry) in report.matches.iter().enumerate() {
        let name = entry.name.as_deref().unwrap_or("<unnamed>");
        writeln!(
            out,
            " {:>2}. {}{}{} #{} {}{:.1} km{}",
            rank + 1,
            p.white_bold,
            name,
            p.reset,
            entry.id,
            p.green,
            entry.distance_km,
            p.reset
        )?;
    }
    Ok(())
}

fn render_dataset_text<W: Write>(out: &mut W, report: &DatasetReport) -> io::Result<()> {
    writeln!(
        out,
        "Dataset at {}: {} nodes, {} lanes, {} basins",
        report.data_dir,
        report.nodes,
        report.lanes,
        report.basins.len()
    )?;
    for (i, basin) in report.basins.iter().enumerate() {
        match &basin.example {
            Some(example) => writeln!(
                out,
                " basin {}: {} nodes (includes {})",
                i + 1,
                basin.nodes,
                example
            )?,
            None => writeln!(out, " basin {}: {} nodes", i + 1, basin.nodes)?,
        }
    }
    Ok(())
}
