//! User entity and related types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{validate_email, validate_name, validate_user_id, UserValidationError};

/// Store-assigned user identifier, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        validate_user_id(id)?;
        Ok(Self(id))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse::<i64>()
            .map_err(|_| UserValidationError::UnparsableId(s.to_string()))?;
        Self::new(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated user that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();

        validate_name(&name)?;
        validate_email(&email)?;

        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Persisted user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    /// Attach an identity to a validated draft
    pub fn new(id: UserId, draft: NewUser) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
        }
    }

    /// Rebuild a record from stored columns
    pub(crate) fn restore(
        id: i64,
        name: String,
        email: String,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            id: UserId::new(id)?,
            name,
            email,
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
