//! Registry API
//!
//! A layered CRUD service for users and insurance plans:
//! - HTTP handlers built on axum
//! - Services that log around each repository call
//! - Repositories for SQLite and PostgreSQL selected by configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::ShutdownListener;
use infrastructure::{Database, PlanService, UserService};

/// Wire services over the repositories of the connected `database`
pub fn create_app_state(
    config: &AppConfig,
    database: &Database,
    shutdown: ShutdownListener,
) -> AppState {
    let user_service = UserService::new(database.user_repository());
    let plan_service = PlanService::new(database.plan_repository());

    AppState {
        user_service: Arc::new(user_service),
        plan_service: Arc::new(plan_service),
        readiness: Arc::new(database.clone()),
        request_timeout: config.server.request_timeout(),
        shutdown,
    }
}
