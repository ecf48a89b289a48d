//! Error type surfaced by the `geprotocol` commands

use crate::config::ConfigError;
use protocol_block::BlockError;
use protocol_params::ParseError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Block(#[from] BlockError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write diff output: {0}")]
    Output(#[source] std::io::Error),

    #[error("failed to serialize parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl Error {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Stable error kind printed ahead of the message on stderr
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Block(e) => e.kind(),
            Error::Parse(e) => e.kind(),
            Error::Config(_) => "ConfigError",
            Error::Read { .. } | Error::Write { .. } | Error::Output(_) => "Io",
            Error::Json(_) => "JsonError",
            Error::Logging(_) => "LoggingError",
        }
    }
}
