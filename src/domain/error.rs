use thiserror::Error;

/// Coarse classification of a [`DomainError`], for callers that branch on
/// the kind of failure without caring about the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    InvalidId,
    Conflict,
    Storage,
    Timeout,
    Cancelled,
    Configuration,
}

/// Core domain errors
///
/// Variants are tagged so that the kind survives every layer between the
/// repository and the HTTP handler untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Deadline exceeded: {message}")]
    Timeout { message: String },

    #[error("Cancelled: {message}")]
    Cancelled { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InvalidId { .. } => ErrorKind::InvalidId,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// The message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::Validation { message }
            | Self::InvalidId { message }
            | Self::Conflict { message }
            | Self::Storage { message }
            | Self::Timeout { message }
            | Self::Cancelled { message }
            | Self::Configuration { message } => message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User '7' not found");
        assert_eq!(error.to_string(), "Not found: User '7' not found");
        assert_eq!(error.message(), "User '7' not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email already exists");
        assert_eq!(error.to_string(), "Conflict: Email already exists");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_errors_compare_by_value() {
        let a = DomainError::storage("database connection failed");
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, DomainError::storage("something else"));
        assert_ne!(a, DomainError::timeout("database connection failed"));
    }

    #[test]
    fn test_kind_covers_every_variant() {
        assert_eq!(DomainError::invalid_id("x").kind(), ErrorKind::InvalidId);
        assert_eq!(DomainError::timeout("x").kind(), ErrorKind::Timeout);
        assert_eq!(DomainError::cancelled("x").kind(), ErrorKind::Cancelled);
        assert_eq!(
            DomainError::configuration("x").kind(),
            ErrorKind::Configuration
        );
    }
}
