//! Plan persistence and service

mod postgres_repository;
mod service;
mod sqlite_repository;

pub use postgres_repository::PostgresPlanRepository;
pub use service::PlanService;
pub use sqlite_repository::SqlitePlanRepository;
