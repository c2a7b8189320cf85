//! Domain layer - Core entities, validation and repository traits

pub mod context;
pub mod error;
pub mod plan;
pub mod user;

pub use context::{RequestContext, Shutdown, ShutdownListener};
pub use error::{DomainError, ErrorKind};
pub use plan::{NewPlan, Plan, PlanId, PlanRepository, PlanValidationError};
pub use user::{NewUser, User, UserId, UserRepository, UserValidationError};
