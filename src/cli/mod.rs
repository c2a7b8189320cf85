//! CLI module for the registry API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply or revert schema migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Registry API - users and plans over SQLite or PostgreSQL
#[derive(Parser)]
#[command(name = "registry-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending migrations for the configured backend
    Migrate(migrate::MigrateArgs),
}

/// Load `.env`, layered config and the global subscriber
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
