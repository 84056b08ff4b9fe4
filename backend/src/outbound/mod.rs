//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories and identity lookups via Diesel.
//! - **memory**: process-local repository for development and tests.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
