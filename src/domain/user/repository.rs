//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{NewUser, User, UserId};
use crate::domain::{DomainError, RequestContext};

/// Repository trait for user storage
///
/// Implementations must report a missing row as [`DomainError::NotFound`]
/// and a duplicate email as [`DomainError::Conflict`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Insert a user and return it with its store-assigned identity
    async fn create(&self, ctx: &RequestContext, user: NewUser) -> Result<User, DomainError>;

    /// Get a user by ID
    async fn get_by_id(&self, ctx: &RequestContext, id: UserId) -> Result<User, DomainError>;

    /// Replace the name and email of an existing user
    async fn update(&self, ctx: &RequestContext, user: &User) -> Result<User, DomainError>;

    /// Delete a user by ID
    async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), DomainError>;

    /// List all users ordered by ascending ID
    async fn list(&self, ctx: &RequestContext) -> Result<Vec<User>, DomainError>;
}
