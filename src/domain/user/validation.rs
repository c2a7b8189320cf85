//! User validation utilities

use thiserror::Error;
use validator::ValidateEmail;

use crate::domain::DomainError;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("User ID must be a positive integer, got {0}")]
    InvalidId(i64),

    #[error("User ID '{0}' is not a valid integer")]
    UnparsableId(String),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email '{0}' is not a valid email address")]
    InvalidEmail(String),
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        match err {
            UserValidationError::InvalidId(_) | UserValidationError::UnparsableId(_) => {
                DomainError::invalid_id(err.to_string())
            }
            _ => DomainError::validation(err.to_string()),
        }
    }
}

pub const MAX_NAME_LENGTH: usize = 100;

/// Validate a user identity
pub fn validate_user_id(id: i64) -> Result<(), UserValidationError> {
    if id <= 0 {
        return Err(UserValidationError::InvalidId(id));
    }

    Ok(())
}

/// Validate a display name
///
/// Rules:
/// - Cannot be empty or whitespace only
/// - Maximum 100 characters
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !email.validate_email() {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_ids() {
        assert!(validate_user_id(1).is_ok());
        assert!(validate_user_id(i64::MAX).is_ok());
    }

    #[test]
    fn test_invalid_user_ids() {
        assert_eq!(validate_user_id(0), Err(UserValidationError::InvalidId(0)));
        assert_eq!(
            validate_user_id(-5),
            Err(UserValidationError::InvalidId(-5))
        );
    }

    #[test]
    fn test_valid_names() {
        assert!(validate_name("John Doe").is_ok());
        assert!(validate_name("J").is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(validate_name(""), Err(UserValidationError::EmptyName));
        assert_eq!(validate_name("   "), Err(UserValidationError::EmptyName));
        assert_eq!(
            validate_name(&"a".repeat(MAX_NAME_LENGTH + 1)),
            Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH))
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        let name = "é".repeat(MAX_NAME_LENGTH);
        assert!(validate_name(&name).is_ok());
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert!(matches!(
            validate_email("not-an-email"),
            Err(UserValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("missing@"),
            Err(UserValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_into_domain_error() {
        let err: DomainError = UserValidationError::InvalidId(0).into();
        assert!(matches!(err, DomainError::InvalidId { .. }));

        let err: DomainError = UserValidationError::EmptyName.into();
        assert_eq!(err, DomainError::validation("Name cannot be empty"));
    }
}
