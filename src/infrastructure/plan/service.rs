//! Plan service

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::plan::{NewPlan, Plan, PlanId, PlanRepository};
use crate::domain::{DomainError, RequestContext};

#[derive(Debug)]
pub struct PlanService<R: PlanRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: PlanRepository + ?Sized> PlanService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, ctx: &RequestContext, plan: NewPlan) -> Result<Plan, DomainError> {
        info!(
            request_id = %ctx.request_id(),
            code = %plan.code(),
            premium = %plan.premium(),
            "Creating plan"
        );

        self.repository
            .create(ctx, plan)
            .await
            .inspect(|plan| info!(request_id = %ctx.request_id(), id = %plan.id(), "Plan created"))
            .inspect_err(|e| log_failure(ctx, "create plan", e))
    }

    pub async fn get(&self, ctx: &RequestContext, id: PlanId) -> Result<Plan, DomainError> {
        info!(request_id = %ctx.request_id(), id = %id, "Fetching plan");

        self.repository
            .get_by_id(ctx, id)
            .await
            .inspect(|plan| info!(request_id = %ctx.request_id(), id = %plan.id(), "Plan fetched"))
            .inspect_err(|e| log_failure(ctx, "get plan", e))
    }

    pub async fn update(&self, ctx: &RequestContext, plan: &Plan) -> Result<Plan, DomainError> {
        info!(request_id = %ctx.request_id(), id = %plan.id(), "Updating plan");

        self.repository
            .update(ctx, plan)
            .await
            .inspect(|plan| info!(request_id = %ctx.request_id(), id = %plan.id(), "Plan updated"))
            .inspect_err(|e| log_failure(ctx, "update plan", e))
    }

    pub async fn delete(&self, ctx: &RequestContext, id: PlanId) -> Result<(), DomainError> {
        info!(request_id = %ctx.request_id(), id = %id, "Deleting plan");

        self.repository
            .delete(ctx, id)
            .await
            .inspect(|_| info!(request_id = %ctx.request_id(), id = %id, "Plan deleted"))
            .inspect_err(|e| log_failure(ctx, "delete plan", e))
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Plan>, DomainError> {
        info!(request_id = %ctx.request_id(), "Listing plans");

        self.repository
            .list(ctx)
            .await
            .inspect(|plans| info!(request_id = %ctx.request_id(), count = plans.len(), "Plans listed"))
            .inspect_err(|e| log_failure(ctx, "list plans", e))
    }
}

fn log_failure(ctx: &RequestContext, operation: &str, err: &DomainError) {
    if err.is_not_found() {
        warn!(request_id = %ctx.request_id(), operation, error = %err, "Plan not found");
    } else {
        error!(request_id = %ctx.request_id(), operation, error = %err, "Plan operation failed");
    }
}
