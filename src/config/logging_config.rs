use crate::config::config::ConfigError;
use serde::Deserialize;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// One of off, error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_log_file_path")]
    pub log_file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_to_file: false,
            log_file_path: default_log_file_path(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_file_path() -> String {
    "geprotocol.log".to_string()
}

impl LoggingConfig {
    pub fn level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;
        if self.log_to_file && self.log_file_path.trim().is_empty() {
            return Err(ConfigError::MissingLogFilePath);
        }
        Ok(())
    }
}
