mod logging_config;
pub mod config;

pub use config::{Config, ConfigError, DecoderConfig, CONFIG_ENV_VAR};
pub use logging_config::LoggingConfig;
