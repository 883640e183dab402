//! SeaRoute CLI library.
//!
//! Terminal styling, log setup and output formatting shared by the
//! `searoute` binary's subcommands.

pub mod logging;
pub mod output;
pub mod terminal;
