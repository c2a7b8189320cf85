//! User service

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::{DomainError, RequestContext};

/// Logs around each user repository call and passes results through unchanged
#[derive(Debug)]
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, ctx: &RequestContext, user: NewUser) -> Result<User, DomainError> {
        info!(
            request_id = %ctx.request_id(),
            name = %user.name(),
            email = %user.email(),
            "Creating user"
        );

        self.repository
            .create(ctx, user)
            .await
            .inspect(|user| info!(request_id = %ctx.request_id(), id = %user.id(), "User created"))
            .inspect_err(|e| log_failure(ctx, "create user", e))
    }

    pub async fn get(&self, ctx: &RequestContext, id: UserId) -> Result<User, DomainError> {
        info!(request_id = %ctx.request_id(), id = %id, "Fetching user");

        self.repository
            .get_by_id(ctx, id)
            .await
            .inspect(|user| info!(request_id = %ctx.request_id(), id = %user.id(), "User fetched"))
            .inspect_err(|e| log_failure(ctx, "get user", e))
    }

    pub async fn update(&self, ctx: &RequestContext, user: &User) -> Result<User, DomainError> {
        info!(request_id = %ctx.request_id(), id = %user.id(), "Updating user");

        self.repository
            .update(ctx, user)
            .await
            .inspect(|user| info!(request_id = %ctx.request_id(), id = %user.id(), "User updated"))
            .inspect_err(|e| log_failure(ctx, "update user", e))
    }

    pub async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), DomainError> {
        info!(request_id = %ctx.request_id(), id = %id, "Deleting user");

        self.repository
            .delete(ctx, id)
            .await
            .inspect(|_| info!(request_id = %ctx.request_id(), id = %id, "User deleted"))
            .inspect_err(|e| log_failure(ctx, "delete user", e))
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<User>, DomainError> {
        info!(request_id = %ctx.request_id(), "Listing users");

        self.repository
            .list(ctx)
            .await
            .inspect(|users| info!(request_id = %ctx.request_id(), count = users.len(), "Users listed"))
            .inspect_err(|e| log_failure(ctx, "list users", e))
    }
}

fn log_failure(ctx: &RequestContext, operation: &str, err: &DomainError) {
    if err.is_not_found() {
        warn!(request_id = %ctx.request_id(), operation, error = %err, "User not found");
    } else {
        error!(request_id = %ctx.request_id(), operation, error = %err, "User operation failed");
    }
}
