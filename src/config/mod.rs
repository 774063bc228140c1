//! Configuration module.
//!
//! Handles event store connection configuration, environment variables, and
//! the TOML settings file.

mod connection;
mod settings;

pub use connection::{ConfigError, StoreConfig};
pub use settings::{
    expand_env_vars, parse_duration, LoggingSettings, OutputSettings, Settings, SettingsError,
    StoreSettings, CONFIG_FILE_NAME,
};
