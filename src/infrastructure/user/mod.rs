//! User persistence and service

mod postgres_repository;
mod service;
mod sqlite_repository;

pub use postgres_repository::PostgresUserRepository;
pub use service::UserService;
pub use sqlite_repository::SqliteUserRepository;
