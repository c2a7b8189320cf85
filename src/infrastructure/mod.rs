//! Infrastructure layer - Database backends, services and logging

pub mod database;
pub mod logging;
pub mod plan;
pub mod user;

pub use database::{Database, Migrator, ReadinessProbe};
pub use plan::PlanService;
pub use user::UserService;
