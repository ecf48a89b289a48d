//! Extract or compare parameters from the GE MRI protocol data block.
//!
//! The heavy lifting lives in the workspace crates: `protocol_block` finds and
//! inflates element (0025,101b), `protocol_params` parses the text into a
//! parameter table and `protocol_diff` compares two tables. This crate wires
//! them to configuration, logging and the command line.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod source;

pub use error::{Error, Result};

use crate::cli::{Cli, Command};
use crate::config::Config;
use std::io::Write;

/// Resolve the configuration for a parsed command line
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load(cli.config.as_deref())?
        .with_overrides(cli.max_size, cli.tolerance)?;
    Ok(config)
}

/// Execute the selected subcommand; diff output goes to `out`
pub fn run<W: Write>(cli: &Cli, config: &Config, out: &mut W) -> Result<()> {
    match &cli.command {
        Command::Json { dicom, json } => commands::json::run(dicom, json, config),
        Command::Diff { reference, test } => commands::diff::run(reference, test, config, out),
    }
}
