//! Plan validation utilities

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during plan validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    #[error("Plan ID must be a positive integer, got {0}")]
    InvalidId(i64),

    #[error("Plan ID '{0}' is not a valid integer")]
    UnparsableId(String),

    #[error("Plan code cannot be empty")]
    EmptyCode,

    #[error("Plan code exceeds maximum length of {0} characters")]
    CodeTooLong(usize),

    #[error("Plan name cannot be empty")]
    EmptyName,

    #[error("Plan name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Premium must be greater than zero, got {0}")]
    NonPositivePremium(Decimal),

    #[error("Premium supports at most {0} decimal places")]
    PremiumTooPrecise(u32),

    #[error("Premium exceeds the maximum of {0}")]
    PremiumTooLarge(Decimal),
}

impl From<PlanValidationError> for DomainError {
    fn from(err: PlanValidationError) -> Self {
        match err {
            PlanValidationError::InvalidId(_) | PlanValidationError::UnparsableId(_) => {
                DomainError::invalid_id(err.to_string())
            }
            _ => DomainError::validation(err.to_string()),
        }
    }
}

pub const MAX_CODE_LENGTH: usize = 50;
pub const MAX_PLAN_NAME_LENGTH: usize = 200;
/// Premiums are stored as NUMERIC(12, 2)
pub const PREMIUM_SCALE: u32 = 2;

/// Largest premium NUMERIC(12, 2) can hold: 9,999,999,999.99
pub fn max_premium() -> Decimal {
    Decimal::new(999_999_999_999, PREMIUM_SCALE)
}

pub fn validate_plan_id(id: i64) -> Result<(), PlanValidationError> {
    if id <= 0 {
        return Err(PlanValidationError::InvalidId(id));
    }

    Ok(())
}

/// Validate a plan code
///
/// Rules:
/// - Cannot be empty or whitespace only
/// - Maximum 50 characters
pub fn validate_code(code: &str) -> Result<(), PlanValidationError> {
    if code.trim().is_empty() {
        return Err(PlanValidationError::EmptyCode);
    }

    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(PlanValidationError::CodeTooLong(MAX_CODE_LENGTH));
    }

    Ok(())
}

pub fn validate_plan_name(name: &str) -> Result<(), PlanValidationError> {
    if name.trim().is_empty() {
        return Err(PlanValidationError::EmptyName);
    }

    if name.chars().count() > MAX_PLAN_NAME_LENGTH {
        return Err(PlanValidationError::NameTooLong(MAX_PLAN_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a premium amount
///
/// Rules:
/// - Strictly positive
/// - At most two decimal places
/// - At most 9,999,999,999.99
pub fn validate_premium(premium: Decimal) -> Result<(), PlanValidationError> {
    if premium <= Decimal::ZERO {
        return Err(PlanValidationError::NonPositivePremium(premium));
    }

    if premium.normalize().scale() > PREMIUM_SCALE {
        return Err(PlanValidationError::PremiumTooPrecise(PREMIUM_SCALE));
    }

    if premium > max_premium() {
        return Err(PlanValidationError::PremiumTooLarge(max_premium()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_max_premium() {
        assert_eq!(max_premium(), dec("9999999999.99"));
    }

    #[test]
    fn test_valid_codes() {
        assert!(validate_code("BASIC").is_ok());
        assert!(validate_code(&"X".repeat(MAX_CODE_LENGTH)).is_ok());
    }

    #[test]
    fn test_invalid_codes() {
        assert_eq!(validate_code(""), Err(PlanValidationError::EmptyCode));
        assert_eq!(
            validate_code(&"X".repeat(MAX_CODE_LENGTH + 1)),
            Err(PlanValidationError::CodeTooLong(MAX_CODE_LENGTH))
        );
    }

    #[test]
    fn test_plan_names() {
        assert!(validate_plan_name("Basic Plan").is_ok());
        assert_eq!(validate_plan_name(" "), Err(PlanValidationError::EmptyName));
        assert_eq!(
            validate_plan_name(&"n".repeat(MAX_PLAN_NAME_LENGTH + 1)),
            Err(PlanValidationError::NameTooLong(MAX_PLAN_NAME_LENGTH))
        );
    }

    #[test]
    fn test_valid_premiums() {
        assert!(validate_premium(dec("99.99")).is_ok());
        assert!(validate_premium(dec("0.01")).is_ok());
        assert!(validate_premium(dec("100.500")).is_ok());
        assert!(validate_premium(max_premium()).is_ok());
    }

    #[test]
    fn test_invalid_premiums() {
        assert!(matches!(
            validate_premium(Decimal::ZERO),
            Err(PlanValidationError::NonPositivePremium(_))
        ));
        assert!(matches!(
            validate_premium(dec("-10")),
            Err(PlanValidationError::NonPositivePremium(_))
        ));
        assert_eq!(
            validate_premium(dec("1.005")),
            Err(PlanValidationError::PremiumTooPrecise(PREMIUM_SCALE))
        );
        assert!(matches!(
            validate_premium(dec("10000000000")),
            Err(PlanValidationError::PremiumTooLarge(_))
        ));
    }

    #[test]
    fn test_into_domain_error() {
        let err: DomainError = PlanValidationError::UnparsableId("x".into()).into();
        assert!(matches!(err, DomainError::InvalidId { .. }));

        let err: DomainError = PlanValidationError::EmptyCode.into();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
