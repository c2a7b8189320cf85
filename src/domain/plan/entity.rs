//! Plan entity and related types

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_code, validate_plan_id, validate_plan_name, validate_premium, PlanValidationError,
    PREMIUM_SCALE,
};

/// Store-assigned plan identifier, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PlanId(i64);

impl PlanId {
    pub fn new(id: i64) -> Result<Self, PlanValidationError> {
        validate_plan_id(id)?;
        Ok(Self(id))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for PlanId {
    type Error = PlanValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlanId> for i64 {
    fn from(id: PlanId) -> Self {
        id.0
    }
}

impl FromStr for PlanId {
    type Err = PlanValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse::<i64>()
            .map_err(|_| PlanValidationError::UnparsableId(s.to_string()))?;
        Self::new(id)
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated plan that has not been persisted yet
///
/// The premium is rescaled to two decimal places so that every backend
/// stores and returns the same representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlan {
    code: String,
    name: String,
    premium: Decimal,
}

impl NewPlan {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        premium: Decimal,
    ) -> Result<Self, PlanValidationError> {
        let code = code.into();
        let name = name.into();

        validate_code(&code)?;
        validate_plan_name(&name)?;
        validate_premium(premium)?;

        let mut premium = premium;
        premium.rescale(PREMIUM_SCALE);

        Ok(Self {
            code,
            name,
            premium,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn premium(&self) -> Decimal {
        self.premium
    }
}

/// Persisted plan record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    id: PlanId,
    code: String,
    name: String,
    premium: Decimal,
}

impl Plan {
    pub fn new(id: PlanId, draft: NewPlan) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            premium: draft.premium,
        }
    }

    /// Rebuild a record from stored columns
    pub(crate) fn restore(
        id: i64,
        code: String,
        name: String,
        premium: Decimal,
    ) -> Result<Self, PlanValidationError> {
        Ok(Self {
            id: PlanId::new(id)?,
            code,
            name,
            premium,
        })
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn premium(&self) -> Decimal {
        self.premium
    }
}
