use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for the store calls of a single request, 0 disables it
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Relational backend the repositories run against
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Sqlite,
    #[serde(alias = "postgresql")]
    Postgres,
}

impl std::fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    /// Connection URL, e.g. `sqlite://data.sqlite` or `postgres://localhost/registry`
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// SQLite only: how long a writer waits on a locked database
    pub busy_timeout_ms: u64,
    /// Apply pending migrations when the server starts
    pub auto_migrate: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_ms: 30_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Sqlite,
            url: "sqlite://data.sqlite".to_string(),
            max_connections: 25,
            min_connections: 5,
            connect_timeout_secs: 10,
            idle_timeout_secs: 30 * 60,
            max_lifetime_secs: 60 * 60,
            busy_timeout_ms: 5_000,
            auto_migrate: true,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

/// Rejected configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidation {
    #[error("server.port must not be 0")]
    ZeroPort,

    #[error("database.url must not be empty")]
    EmptyDatabaseUrl,

    #[error("database.max_connections must be at least 1")]
    ZeroMaxConnections,

    #[error(
        "database.min_connections ({min}) must not exceed database.max_connections ({max})"
    )]
    PoolBounds { min: u32, max: u32 },

    #[error("database.url '{url}' does not match backend '{backend}'")]
    BackendMismatch { backend: DatabaseBackend, url: String },
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Check cross-field constraints the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigValidation> {
        if self.server.port == 0 {
            return Err(ConfigValidation::ZeroPort);
        }

        let db = &self.database;

        if db.url.trim().is_empty() {
            return Err(ConfigValidation::EmptyDatabaseUrl);
        }

        if db.max_connections == 0 {
            return Err(ConfigValidation::ZeroMaxConnections);
        }

        if db.min_connections > db.max_connections {
            return Err(ConfigValidation::PoolBounds {
                min: db.min_connections,
                max: db.max_connections,
            });
        }

        let scheme_matches = match db.backend {
            DatabaseBackend::Sqlite => db.url.starts_with("sqlite:"),
            DatabaseBackend::Postgres => {
                db.url.starts_with("postgres://") || db.url.starts_with("postgresql://")
            }
        };

        if !scheme_matches {
            return Err(ConfigValidation::BackendMismatch {
                backend: db.backend,
                url: db.url.clone(),
            });
        }

        Ok(())
    }
}
