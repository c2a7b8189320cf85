//! Plan repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewPlan, Plan, PlanId};
use crate::domain::{DomainError, RequestContext};

/// Repository trait for plan storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlanRepository: Send + Sync + Debug {
    /// Insert a plan and return it with its store-assigned identity
    async fn create(&self, ctx: &RequestContext, plan: NewPlan) -> Result<Plan, DomainError>;

    async fn get_by_id(&self, ctx: &RequestContext, id: PlanId) -> Result<Plan, DomainError>;

    /// Replace code, name and premium of an existing plan
    async fn update(&self, ctx: &RequestContext, plan: &Plan) -> Result<Plan, DomainError>;

    async fn delete(&self, ctx: &RequestContext, id: PlanId) -> Result<(), DomainError>;

    /// List all plans ordered by ascending ID
    async fn list(&self, ctx: &RequestContext) -> Result<Vec<Plan>, DomainError>;
}
