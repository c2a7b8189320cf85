//! SQLite user repository implementation

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::debug;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::{DomainError, RequestContext};
use crate::infrastructure::database::{is_unique_violation, storage_error};

#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, ctx: &RequestContext, user: NewUser) -> Result<User, DomainError> {
        ctx.run("create user", async {
            let result = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
                .bind(user.name())
                .bind(user.email())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        DomainError::conflict(format!("Email '{}' already exists", user.email()))
                    } else {
                        storage_error("Failed to create user", e)
                    }
                })?;

            let id = UserId::new(result.last_insert_rowid()).map_err(|e| {
                DomainError::storage(format!("Store returned an unusable user id: {}", e))
            })?;

            debug!(request_id = %ctx.request_id(), id = %id, "Inserted user row");
            Ok(User::new(id, user))
        })
        .await
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: UserId) -> Result<User, DomainError> {
        ctx.run("get user", async {
            let row = sqlx::query("SELECT id, name, email FROM users WHERE id = ?")
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to get user", e))?;

            match row {
                Some(row) => row_to_user(&row),
                None => Err(DomainError::not_found(format!("User '{}' not found", id))),
            }
        })
        .await
    }

    async fn update(&self, ctx: &RequestContext, user: &User) -> Result<User, DomainError> {
        ctx.run("update user", async {
            let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
                .bind(user.name())
                .bind(user.email())
                .bind(user.id().value())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        DomainError::conflict(format!("Email '{}' already exists", user.email()))
                    } else {
                        storage_error("Failed to update user", e)
                    }
                })?;

            if result.rows_affected() == 0 {
                return Err(DomainError::not_found(format!(
                    "User '{}' not found",
                    user.id()
                )));
            }

            Ok(user.clone())
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), DomainError> {
        ctx.run("delete user", async {
            let result = sqlx::query("DELETE FROM users WHERE id = ?")
                .bind(id.value())
                .execute(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to delete user", e))?;

            if result.rows_affected() == 0 {
                return Err(DomainError::not_found(format!("User '{}' not found", id)));
            }

            Ok(())
        })
        .await
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<User>, DomainError> {
        ctx.run("list users", async {
            let rows = sqlx::query("SELECT id, name, email FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to list users", e))?;

            rows.iter().map(row_to_user).collect()
        })
        .await
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| storage_error("Failed to read user id", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| storage_error("Failed to read user name", e))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| storage_error("Failed to read user email", e))?;

    User::restore(id, name, email)
        .map_err(|e| DomainError::storage(format!("Corrupt user row {}: {}", id, e)))
}
