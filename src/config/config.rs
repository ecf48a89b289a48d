use crate::config::logging_config::LoggingConfig;
use protocol_block::DEFAULT_MAX_DECOMPRESSED_BYTES;
use protocol_diff::{DiffError, DiffOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file when `--config` is not given
pub const CONFIG_ENV_VAR: &str = "GEPROTOCOL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("decoder.max_decompressed_bytes must be greater than zero")]
    InvalidMaxSize,

    #[error("invalid [diff] section: {0}")]
    InvalidTolerance(#[from] DiffError),

    #[error("logging.log_level '{0}' is not a valid level")]
    InvalidLogLevel(String),

    #[error("logging.log_file_path must be set when log_to_file is enabled")]
    MissingLogFilePath,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub diff: DiffOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Ceiling on the inflated protocol text, in bytes
    #[serde(default = "default_max_decompressed_bytes")]
    pub max_decompressed_bytes: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_decompressed_bytes: default_max_decompressed_bytes(),
        }
    }
}

fn default_max_decompressed_bytes() -> usize {
    DEFAULT_MAX_DECOMPRESSED_BYTES
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `path`, else from `$GEPROTOCOL_CONFIG`, else built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) if !value.is_empty() => Self::from_file(Path::new(&value)),
            _ => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_overrides(
        mut self,
        max_decompressed_bytes: Option<usize>,
        float_tolerance: Option<f64>,
    ) -> Result<Self, ConfigError> {
        if let Some(limit) = max_decompressed_bytes {
            self.decoder.max_decompressed_bytes = limit;
        }
        if float_tolerance.is_some() {
            self.diff.float_tolerance = float_tolerance;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decoder.max_decompressed_bytes == 0 {
            return Err(ConfigError::InvalidMaxSize);
        }
        self.diff.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
