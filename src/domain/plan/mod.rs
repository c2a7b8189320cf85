//! Plan domain

mod entity;
mod repository;
mod validation;

pub use entity::{NewPlan, Plan, PlanId};
pub use repository::PlanRepository;
pub use validation::{
    max_premium, validate_code, validate_plan_id, validate_plan_name, validate_premium,
    PlanValidationError, MAX_CODE_LENGTH, MAX_PLAN_NAME_LENGTH, PREMIUM_SCALE,
};

#[cfg(test)]
pub use repository::MockPlanRepository;
