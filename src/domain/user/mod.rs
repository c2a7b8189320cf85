//! User domain
//!
//! Domain types for user records: identity, validated drafts, the
//! persisted entity and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_name, validate_user_id, UserValidationError, MAX_NAME_LENGTH,
};

#[cfg(test)]
pub use repository::MockUserRepository;
