//! PostgreSQL plan repository implementation

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::debug;

use crate::domain::plan::{NewPlan, Plan, PlanId, PlanRepository};
use crate::domain::{DomainError, RequestContext};
use crate::infrastructure::database::storage_error;

/// PostgreSQL implementation of PlanRepository
#[derive(Debug, Clone)]
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn create(&self, ctx: &RequestContext, plan: NewPlan) -> Result<Plan, DomainError> {
        ctx.run("create plan", async {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO plans (code, name, premium) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(plan.code())
            .bind(plan.name())
            .bind(plan.premium())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create plan", e))?;

            let id = PlanId::new(id).map_err(|e| {
                DomainError::storage(format!("Store returned an unusable plan id: {}", e))
            })?;

            debug!(request_id = %ctx.request_id(), id = %id, "Inserted plan row");
            Ok(Plan::new(id, plan))
        })
        .await
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: PlanId) -> Result<Plan, DomainError> {
        ctx.run("get plan", async {
            let row = sqlx::query("SELECT id, code, name, premium FROM plans WHERE id = $1")
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to get plan", e))?;

            match row {
                Some(row) => row_to_plan(&row),
                None => Err(DomainError::not_found(format!("Plan '{}' not found", id))),
            }
        })
        .await
    }

    async fn update(&self, ctx: &RequestContext, plan: &Plan) -> Result<Plan, DomainError> {
        ctx.run("update plan", async {
            let result =
                sqlx::query("UPDATE plans SET code = $2, name = $3, premium = $4 WHERE id = $1")
                    .bind(plan.id().value())
                    .bind(plan.code())
                    .bind(plan.name())
                    .bind(plan.premium())
                    .execute(&self.pool)
                    .await
                    .map_err(|e| storage_error("Failed to update plan", e))?;

            if result.rows_affected() == 0 {
                return Err(DomainError::not_found(format!(
                    "Plan '{}' not found",
                    plan.id()
                )));
            }

            Ok(plan.clone())
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, id: PlanId) -> Result<(), DomainError> {
        ctx.run("delete plan", async {
            let result = sqlx::query("DELETE FROM plans WHERE id = $1")
                .bind(id.value())
                .execute(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to delete plan", e))?;

            if result.rows_affected() == 0 {
                return Err(DomainError::not_found(format!("Plan '{}' not found", id)));
            }

            Ok(())
        })
        .await
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<Plan>, DomainError> {
        ctx.run("list plans", async {
            let rows = sqlx::query("SELECT id, code, name, premium FROM plans ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to list plans", e))?;

            rows.iter().map(row_to_plan).collect()
        })
        .await
    }
}

fn row_to_plan(row: &PgRow) -> Result<Plan, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| storage_error("Failed to read plan id", e))?;
    let code: String = row
        .try_get("code")
        .map_err(|e| storage_error("Failed to read plan code", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| storage_error("Failed to read plan name", e))?;
    let premium: Decimal = row
        .try_get("premium")
        .map_err(|e| storage_error("Failed to read plan premium", e))?;

    Plan::restore(id, code, name, premium)
        .map_err(|e| DomainError::storage(format!("Corrupt plan row {}: {}", id, e)))
}
