mod commands;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use searoute_cli::logging::{init_logging, LoggingConfig};
use searoute_cli::output::{print_footer, print_logo, OutputFormat};

use crate::commands::nearest::{handle_nearest_command, NearestCommandArgs};
use crate::commands::route::{handle_route_command, RouteCommandArgs};
use crate::commands::validate::handle_validate_command;

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest sea routes over a maritime lane network")]
struct Cli {
    /// Directory holding nodes.csv and lanes.csv (default: $SEAROUTE_DATA_DIR,
    /// then the platform data directory).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Suppress the banner and timing footer in text output.
    #[arg(long, global = true)]
    no_logo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the shortest sea route between two ports or coordinates.
    Route(RouteCommandArgs),
    /// List the lane nodes closest to a coordinate.
    Nearest(NearestCommandArgs),
    /// Load the dataset and report node, lane and basin counts.
    Validate,
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());
    let cli = Cli::parse();

    let decorated = cli.format == OutputFormat::Text && !cli.no_logo;
    let started = Instant::now();
    if decorated {
        print_logo();
    }

    let data_dir = cli.data_dir.as_deref();
    match &cli.command {
        Command::Route(args) => handle_route_command(data_dir, cli.format, args)?,
        Command::Nearest(args) => handle_nearest_command(data_dir, cli.format, args)?,
        Command::Validate => handle_validate_command(data_dir, cli.format)?,
    }

    if decorated {
        print_footer(started.elapsed());
    }
    Ok(())
}
