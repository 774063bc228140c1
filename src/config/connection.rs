//! Event store connection configuration.
//!
//! Supports configuration via environment variables:
//! - `NOTIFY_DB_NAME`: Database (SQLite file path for the bundled store)
//! - `NOTIFY_DB_HOST`: Server hostname (networked stores only)
//! - `NOTIFY_DB_USER`: Username (networked stores only)
//! - `NOTIFY_DB_PASSWORD`: Credential (networked stores only, never logged)
//! - `NOTIFY_DB_TIMEOUT_SECS`: Query timeout in seconds

use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Connection settings handed to the event store reader at construction.
///
/// The credential is held for networked stores and is redacted from `Debug`
/// output and from [`StoreConfig::describe`].
#[derive(Clone, PartialEq)]
pub struct StoreConfig {
    /// Server hostname.
    pub host: String,
    /// Username.
    pub user: Option<String>,
    /// Password or token.
    pub credential: Option<String>,
    /// Database name; for SQLite, the database file path.
    pub database: String,
    /// Upper bound on how long a query waits for the store.
    pub query_timeout: Duration,
}

impl StoreConfig {
    /// Default query timeout.
    pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default host label.
    pub const DEFAULT_HOST: &'static str = "localhost";

    /// Configuration for a local SQLite database file.
    pub fn sqlite(path: impl AsRef<Path>) -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            user: None,
            credential: None,
            database: path.as_ref().to_string_lossy().into_owned(),
            query_timeout: Self::DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `NOTIFY_DB_NAME`
    ///
    /// Optional:
    /// - `NOTIFY_DB_HOST` (default `localhost`)
    /// - `NOTIFY_DB_USER`
    /// - `NOTIFY_DB_PASSWORD`
    /// - `NOTIFY_DB_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = env::var("NOTIFY_DB_NAME")
            .map_err(|_| ConfigError::MissingEnvVar("NOTIFY_DB_NAME".to_string()))?;

        let host = env::var("NOTIFY_DB_HOST").unwrap_or_else(|_| Self::DEFAULT_HOST.to_string());

        let query_timeout = match env::var("NOTIFY_DB_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    var: "NOTIFY_DB_TIMEOUT_SECS".to_string(),
                    value: raw,
                })?,
            Err(_) => Self::DEFAULT_QUERY_TIMEOUT,
        };

        let config = Self {
            host,
            user: env::var("NOTIFY_DB_USER").ok(),
            credential: env::var("NOTIFY_DB_PASSWORD").ok(),
            database,
            query_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no store can use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "database must not be empty".to_string(),
            ));
        }
        if self.query_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "query timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> &Path {
        Path::new(&self.database)
    }

    /// Human-readable target description, safe to log.
    pub fn describe(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}/{}", user, self.host, self.database),
            None => format!("{}/{}", self.host, self.database),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}
