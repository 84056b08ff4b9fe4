//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! and table definitions stay private to this module; every database failure
//! is mapped into the owning port's error type.

mod diesel_error_mapping;
mod diesel_identity_provider;
mod diesel_issue_repository;
mod diesel_login_service;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_identity_provider::DieselIdentityProvider;
pub use diesel_issue_repository::DieselIssueRepository;
pub use diesel_login_service::DieselLoginService;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
