//! Shared Diesel and pool error classification for repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse category of a Diesel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection,
    /// A NOT NULL or CHECK constraint rejected the row.
    Validation,
    /// Anything else.
    Query,
}

/// Log and classify a Diesel error.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation,
            _,
        ) => DieselFailure::Validation,
        _ => DieselFailure::Query,
    }
}

/// Client-safe message for a classified failure.
pub(crate) const fn failure_message(failure: DieselFailure) -> &'static str {
    match failure {
        DieselFailure::Connection => "database connection error",
        DieselFailure::Validation => "record violates a storage constraint",
        DieselFailure::Query => "database error",
    }
}
