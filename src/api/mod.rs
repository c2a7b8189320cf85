//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod plans;
pub mod router;
pub mod state;
pub mod types;
pub mod users;

pub use router::create_router;
pub use state::AppState;
