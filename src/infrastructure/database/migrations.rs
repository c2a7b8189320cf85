//! Schema migrations for both backends

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use super::storage_error;
use crate::domain::DomainError;

/// Applies and reverts the embedded schema migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Reverts the most recently applied migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Returns the latest applied migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

pub fn sqlite_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            );
            "#,
            "DROP TABLE IF EXISTS users;",
        ),
        Migration::new(
            2,
            "Create plans table",
            r#"
            CREATE TABLE IF NOT EXISTS plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL,
                name TEXT NOT NULL,
                premium TEXT NOT NULL
            );
            "#,
            "DROP TABLE IF EXISTS plans;",
        ),
    ]
}

pub fn postgres_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            );
            "#,
            "DROP TABLE IF EXISTS users;",
        ),
        Migration::new(
            2,
            "Create plans table",
            r#"
            CREATE TABLE IF NOT EXISTS plans (
                id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                code TEXT NOT NULL,
                name TEXT NOT NULL,
                premium NUMERIC(12, 2) NOT NULL
            );
            "#,
            "DROP TABLE IF EXISTS plans;",
        ),
    ]
}

/// Bookkeeping statements that differ between SQL dialects
struct DialectSql {
    create_table: &'static str,
    is_applied: &'static str,
    record: &'static str,
    forget: &'static str,
}

const SQLITE_SQL: DialectSql = DialectSql {
    create_table: r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            installed_on TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    is_applied: "SELECT COUNT(*) FROM _migrations WHERE version = ?",
    record: "INSERT INTO _migrations (version, description) VALUES (?, ?)",
    forget: "DELETE FROM _migrations WHERE version = ?",
};

const POSTGRES_SQL: DialectSql = DialectSql {
    create_table: r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version BIGINT PRIMARY KEY,
            description TEXT NOT NULL,
            installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    is_applied: "SELECT COUNT(*) FROM _migrations WHERE version = $1",
    record: "INSERT INTO _migrations (version, description) VALUES ($1, $2)",
    forget: "DELETE FROM _migrations WHERE version = $1",
};

/// Generates a migrator over one pool type; only the bookkeeping SQL differs
macro_rules! sql_migrator {
    ($name:ident, $pool:ty, $migrations:path, $sql:expr) => {
        #[derive(Debug)]
        pub struct $name {
            pool: $pool,
            migrations: Vec<Migration>,
        }

        impl $name {
            pub fn new(pool: $pool) -> Self {
                Self {
                    pool,
                    migrations: $migrations(),
                }
            }

            async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
                sqlx::query($sql.create_table)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| storage_error("Failed to create migrations table", e))?;

                Ok(())
            }

            async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
                let count: i64 = sqlx::query_scalar($sql.is_applied)
                    .bind(version)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| storage_error("Failed to check migration status", e))?;

                Ok(count > 0)
            }

            /// Applies one migration and records it in the same transaction
            pub async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
                self.ensure_migrations_table().await?;

                if self.is_applied(migration.version).await? {
                    return Ok(());
                }

                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| storage_error("Failed to begin migration", e))?;

                sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.up))
                    .await
                    .map_err(|e| {
                        storage_error(&format!("Failed to run migration {}", migration.version), e)
                    })?;

                sqlx::query($sql.record)
                    .bind(migration.version)
                    .bind(&migration.description)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        storage_error(&format!("Failed to record migration {}", migration.version), e)
                    })?;

                tx.commit()
                    .await
                    .map_err(|e| storage_error("Failed to commit migration", e))?;

                info!(version = migration.version, description = %migration.description, "Applied migration");
                Ok(())
            }

            pub async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
                self.ensure_migrations_table().await?;

                if !self.is_applied(migration.version).await? {
                    return Ok(());
                }

                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| storage_error("Failed to begin revert", e))?;

                sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.down))
                    .await
                    .map_err(|e| {
                        storage_error(&format!("Failed to revert migration {}", migration.version), e)
                    })?;

                sqlx::query($sql.forget)
                    .bind(migration.version)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        storage_error(
                            &format!("Failed to remove migration record {}", migration.version),
                            e,
                        )
                    })?;

                tx.commit()
                    .await
                    .map_err(|e| storage_error("Failed to commit revert", e))?;

                info!(version = migration.version, description = %migration.description, "Reverted migration");
                Ok(())
            }
        }

        #[async_trait]
        impl Migrator for $name {
            async fn run(&self) -> Result<(), DomainError> {
                for migration in &self.migrations {
                    self.run_migration(migration).await?;
                }

                Ok(())
            }

            async fn revert(&self) -> Result<(), DomainError> {
                let Some(version) = self.version().await? else {
                    return Ok(());
                };

                match self.migrations.iter().find(|m| m.version == version) {
                    Some(migration) => self.revert_migration(migration).await,
                    None => Err(DomainError::storage(format!(
                        "Applied migration {} is unknown to this build",
                        version
                    ))),
                }
            }

            async fn version(&self) -> Result<Option<i64>, DomainError> {
                self.ensure_migrations_table().await?;

                sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| storage_error("Failed to get migration version", e))
            }
        }
    };
}

sql_migrator!(SqliteMigrator, SqlitePool, sqlite_migrations, SQLITE_SQL);
sql_migrator!(PostgresMigrator, PgPool, postgres_migrations, POSTGRES_SQL);
