//! Application state for shared services

use std::sync::Arc;
use std::time::Duration;

use crate::domain::plan::PlanRepository;
use crate::domain::user::UserRepository;
use crate::domain::{
    DomainError, NewPlan, NewUser, Plan, PlanId, RequestContext, ShutdownListener, User, UserId,
};
use crate::infrastructure::{PlanService, ReadinessProbe, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub plan_service: Arc<dyn PlanServiceTrait>,
    pub readiness: Arc<dyn ReadinessProbe>,
    /// Deadline applied to the store calls of each request
    pub request_timeout: Option<Duration>,
    pub shutdown: ShutdownListener,
}

/// Trait for user service operations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, ctx: &RequestContext, user: NewUser) -> Result<User, DomainError>;
    async fn get(&self, ctx: &RequestContext, id: UserId) -> Result<User, DomainError>;
    async fn update(&self, ctx: &RequestContext, user: &User) -> Result<User, DomainError>;
    async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), DomainError>;
    async fn list(&self, ctx: &RequestContext) -> Result<Vec<User>, DomainError>;
}

/// Trait for plan service operations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlanServiceTrait: Send + Sync {
    async fn create(&self, ctx: &RequestContext, plan: NewPlan) -> Result<Plan, DomainError>;
    async fn get(&self, ctx: &RequestContext, id: PlanId) -> Result<Plan, DomainError>;
    async fn update(&self, ctx: &RequestContext, plan: &Plan) -> Result<Plan, DomainError>;
    async fn delete(&self, ctx: &RequestContext, id: PlanId) -> Result<(), DomainError>;
    async fn list(&self, ctx: &RequestContext) -> Result<Vec<Plan>, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + ?Sized + 'static> UserServiceTrait for UserService<R> {
    async fn create(&self, ctx: &RequestContext, user: NewUser) -> Result<User, DomainError> {
        UserService::create(self, ctx, user).await
    }

    async fn get(&self, ctx: &RequestContext, id: UserId) -> Result<User, DomainError> {
        UserService::get(self, ctx, id).await
    }

    async fn update(&self, ctx: &RequestContext, user: &User) -> Result<User, DomainError> {
        UserService::update(self, ctx, user).await
    }

    async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), DomainError> {
        UserService::delete(self, ctx, id).await
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<User>, DomainError> {
        UserService::list(self, ctx).await
    }
}

#[async_trait::async_trait]
impl<R: PlanRepository + ?Sized + 'static> PlanServiceTrait for PlanService<R> {
    async fn create(&self, ctx: &RequestContext, plan: NewPlan) -> Result<Plan, DomainError> {
        PlanService::create(self, ctx, plan).await
    }

    async fn get(&self, ctx: &RequestContext, id: PlanId) -> Result<Plan, DomainError> {
        PlanService::get(self, ctx, id).await
    }

    async fn update(&self, ctx: &RequestContext, plan: &Plan) -> Result<Plan, DomainError> {
        PlanService::update(self, ctx, plan).await
    }

    async fn delete(&self, ctx: &RequestContext, id: PlanId) -> Result<(), DomainError> {
        PlanService::delete(self, ctx, id).await
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<Plan>, DomainError> {
        PlanService::list(self, ctx).await
    }
}

/// State whose services panic on any unexpected call
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    state_with(MockUserServiceTrait::new(), MockPlanServiceTrait::new())
}

#[cfg(test)]
pub(crate) fn state_with(users: MockUserServiceTrait, plans: MockPlanServiceTrait) -> AppState {
    let mut readiness = crate::infrastructure::database::MockReadinessProbe::new();
    readiness.expect_name().return_const("database:mock".to_string());
    readiness.expect_check().returning(|_| Ok(()));

    AppState {
        user_service: Arc::new(users),
        plan_service: Arc::new(plans),
        readiness: Arc::new(readiness),
        request_timeout: None,
        shutdown: ShutdownListener::never(),
    }
}
