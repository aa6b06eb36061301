use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub client: ClientSettings,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// `host:port`, ready for `SocketAddr` parsing.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseSettings {
    /// A PostgreSQL connection string. Usually supplied through `DATABASE_URL`.
    pub url: String,
    pub max_connections: u32,
    /// How long a request may wait for a pooled connection.
    pub acquire_timeout_secs: u64,
    /// Apply the embedded migrations before serving.
    pub run_migrations: bool,
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `web_server=debug,info`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Settings for talking to a running dashboard API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
}

impl Settings {
    /// Checks the values that are invalid regardless of which command runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("server.port must not be 0".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.client.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("client.base_url must be set".to_string()));
        }
        Ok(())
    }

    /// The database URL, for commands that cannot run without one.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        let url = self.database.url.trim();
        if url.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url is empty; set DATABASE_URL or TANGGUH__DATABASE__URL".to_string(),
            ));
        }
        Ok(url)
    }
}
