//! Process-wide tracing setup.
//!
//! Events go to stderr so stdout carries nothing but diff output. With
//! `log_to_file` a second layer writes the same events to the configured file.

use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use std::sync::Mutex;
use tracing_subscriber::{self, prelude::*, EnvFilter};

/// Filter for this run: `-v` wins over `RUST_LOG`, which wins over the config
pub fn build_filter(config: &LoggingConfig, verbose: u8) -> Result<EnvFilter> {
    let forced = match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    if let Some(level) = forced {
        return Ok(EnvFilter::new(level));
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = config.level()?;
    Ok(EnvFilter::default().add_directive(level.into()))
}

pub fn init(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = build_filter(config, verbose)?;

    let file_layer = if config.log_to_file {
        let file = std::fs::File::create(&config.log_file_path)
            .map_err(|e| Error::write(&config.log_file_path, e))?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
