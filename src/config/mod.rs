//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, ConfigValidation, DatabaseBackend, DatabaseConfig, LogFormat, LoggingConfig,
    ServerConfig,
};
