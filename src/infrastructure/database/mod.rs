//! Connection pools and repository wiring for the configured backend

mod migrations;

pub use migrations::{
    postgres_migrations, sqlite_migrations, Migration, Migrator, PostgresMigrator, SqliteMigrator,
};

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::domain::{DomainError, PlanRepository, RequestContext, UserRepository};
use crate::infrastructure::plan::{PostgresPlanRepository, SqlitePlanRepository};
use crate::infrastructure::user::{PostgresUserRepository, SqliteUserRepository};

/// A connected pool for one of the supported backends
#[derive(Debug, Clone)]
pub enum Database {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl Database {
    /// Open a pool according to `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let database = match config.backend {
            DatabaseBackend::Sqlite => Self::Sqlite(connect_sqlite(config).await?),
            DatabaseBackend::Postgres => Self::Postgres(connect_postgres(config).await?),
        };

        info!(
            backend = %config.backend,
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database pool established"
        );

        Ok(database)
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Self::Sqlite(_) => DatabaseBackend::Sqlite,
            Self::Postgres(_) => DatabaseBackend::Postgres,
        }
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        match self {
            Self::Sqlite(pool) => Arc::new(SqliteUserRepository::new(pool.clone())),
            Self::Postgres(pool) => Arc::new(PostgresUserRepository::new(pool.clone())),
        }
    }

    pub fn plan_repository(&self) -> Arc<dyn PlanRepository> {
        match self {
            Self::Sqlite(pool) => Arc::new(SqlitePlanRepository::new(pool.clone())),
            Self::Postgres(pool) => Arc::new(PostgresPlanRepository::new(pool.clone())),
        }
    }

    pub fn migrator(&self) -> Box<dyn Migrator> {
        match self {
            Self::Sqlite(pool) => Box::new(SqliteMigrator::new(pool.clone())),
            Self::Postgres(pool) => Box::new(PostgresMigrator::new(pool.clone())),
        }
    }

    /// Round-trip a trivial query
    pub async fn ping(&self, ctx: &RequestContext) -> Result<(), DomainError> {
        ctx.run("ping database", async {
            let result = match self {
                Self::Sqlite(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
                Self::Postgres(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            };

            result.map_err(|e| storage_error("Database ping failed", e))
        })
        .await
    }

    /// Close every pooled connection, waiting for checked-out ones
    pub async fn close(&self) {
        match self {
            Self::Sqlite(pool) => pool.close().await,
            Self::Postgres(pool) => pool.close().await,
        }

        info!(backend = %self.backend(), "Database pool closed");
    }
}

/// Readiness check used by the `/ready` endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Component name reported in the health response
    fn name(&self) -> String;

    async fn check(&self, ctx: &RequestContext) -> Result<(), DomainError>;
}

#[async_trait]
impl ReadinessProbe for Database {
    fn name(&self) -> String {
        format!("database:{}", self.backend())
    }

    async fn check(&self, ctx: &RequestContext) -> Result<(), DomainError> {
        self.ping(ctx).await
    }
}

async fn connect_sqlite(config: &DatabaseConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::configuration(format!("Invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_with(options)
        .await
        .map_err(|e| storage_error("Failed to connect to SQLite", e))
}

async fn connect_postgres(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
        .map_err(|e| storage_error("Failed to connect to PostgreSQL", e))
}

pub(crate) fn storage_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::storage(format!("{}: {}", context, err))
}

/// True when the driver reports a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Single-connection in-memory SQLite pool with the schema applied
#[cfg(test)]
pub(crate) async fn sqlite_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    SqliteMigrator::new(pool.clone()).run().await.unwrap();

    pool
}
