//! TOML-based configuration for the reporting pipeline.
//!
//! Supports a config file (`notification-analytics.toml`) with environment
//! variable expansion.
//!
//! Example configuration:
//! ```toml
//! [store]
//! database = "./data/notifications.db"
//! host = "localhost"
//! user = "${NOTIFY_DB_USER}"
//! credential = "${NOTIFY_DB_PASSWORD}"
//! query_timeout = "30s"
//!
//! [output]
//! directory = "analytics_output"
//!
//! [logging]
//! filter = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::connection::StoreConfig;

/// Config file name searched in the working directory.
pub const CONFIG_FILE_NAME: &str = "notification-analytics.toml";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid duration format: {0}")]
    InvalidDuration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Event store connection.
    pub store: StoreSettings,

    /// Artifact destination.
    pub output: OutputSettings,

    /// Log filtering.
    pub logging: LoggingSettings,
}

/// Event store section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Database name or SQLite file path (supports ${ENV_VAR} expansion).
    pub database: String,

    /// Server hostname.
    pub host: String,

    /// Username (supports ${ENV_VAR} expansion).
    pub user: Option<String>,

    /// Credential (supports ${ENV_VAR} expansion).
    pub credential: Option<String>,

    /// Query timeout (e.g., "30s", "2m").
    pub query_timeout: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database: "notifications.db".to_string(),
            host: StoreConfig::DEFAULT_HOST.to_string(),
            user: None,
            credential: None,
            query_timeout: "30s".to_string(),
        }
    }
}

impl StoreSettings {
    /// Resolve environment variables and build the reader configuration.
    pub fn to_store_config(&self) -> Result<StoreConfig, SettingsError> {
        let config = StoreConfig {
            host: expand_env_vars(&self.host)?,
            user: self.user.as_deref().map(expand_env_vars).transpose()?,
            credential: self.credential.as_deref().map(expand_env_vars).transpose()?,
            database: expand_env_vars(&self.database)?,
            query_timeout: parse_duration(&self.query_timeout)?,
        };
        config
            .validate()
            .map_err(|e| SettingsError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }
}

/// Output section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory receiving charts and CSV exports.
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("analytics_output"),
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `NOTIFY_ANALYTICS_CONFIG`
    /// 2. `./notification-analytics.toml`
    /// 3. `<config dir>/notification-analytics/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("NOTIFY_ANALYTICS_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("notification-analytics").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Resolve the store for a command.
    ///
    /// An explicit `database` path wins, then the `NOTIFY_DB_*` variables,
    /// then the `[store]` section. Only the winning source is resolved, so a
    /// broken `[store]` section does not block an override. With an explicit
    /// path, the configured timeout is kept if it parses.
    pub fn store_config(&self, database: Option<&Path>) -> Result<StoreConfig, SettingsError> {
        if let Some(path) = database {
            let timeout = parse_duration(&self.store.query_timeout)
                .ok()
                .filter(|t| !t.is_zero())
                .unwrap_or(StoreConfig::DEFAULT_QUERY_TIMEOUT);
            return Ok(StoreConfig::sqlite(path).with_query_timeout(timeout));
        }

        if env::var_os("NOTIFY_DB_NAME").is_some() {
            return StoreConfig::from_env().map_err(|e| SettingsError::InvalidConfig(e.to_string()));
        }

        self.store.to_store_config()
    }
}

/// Parse a duration such as `30s`, `5m`, `1h`, `250ms`, or a bare number of
/// seconds.
pub fn parse_duration(s: &str) -> Result<Duration, SettingsError> {
    let s = s.trim();
    let invalid = || SettingsError::InvalidDuration(s.to_string());

    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    let amount: u64 = digits.parse().map_err(|_| invalid())?;

    match unit.trim() {
        "" | "s" => Ok(Duration::from_secs(amount)),
        "ms" => Ok(Duration::from_millis(amount)),
        "m" => Ok(Duration::from_secs(amount * 60)),
        "h" => Ok(Duration::from_secs(amount * 3600)),
        _ => Err(invalid()),
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
