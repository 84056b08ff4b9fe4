//! Driven port for issue persistence.
//!
//! Adapters translate listing requests into store queries and keep the
//! aggregate counters the dashboard needs. Issues are never deleted.

use async_trait::async_trait;

use crate::domain::{Issue, IssueId, IssueListQuery, IssueStatus, NewIssue};

use super::define_port_error;

define_port_error! {
    /// Errors raised by issue repository adapters.
    pub enum IssueRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "issue repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } =>
            "issue repository query failed: {message}",
        /// The store rejected the record as incomplete or out of range.
        Validation { message: String } =>
            "issue repository rejected record: {message}",
        /// An update addressed an issue that does not exist.
        NotFound { id: i64 } =>
            "issue {id} does not exist",
    }
}

/// Port for issue storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Issues matching the optional category, ordered as requested with ties
    /// broken by ascending id.
    async fn list(&self, query: IssueListQuery) -> Result<Vec<Issue>, IssueRepositoryError>;

    /// Number of stored issues.
    async fn count_total(&self) -> Result<u64, IssueRepositoryError>;

    /// Number of stored issues with `status`.
    async fn count_by_status(&self, status: IssueStatus) -> Result<u64, IssueRepositoryError>;

    async fn find_by_id(&self, id: IssueId) -> Result<Option<Issue>, IssueRepositoryError>;

    /// Persist a draft and return it with its assigned id.
    async fn create(&self, issue: NewIssue) -> Result<Issue, IssueRepositoryError>;

    /// Overwrite title, description, category, priority and status.
    ///
    /// Creation metadata is never written. Fails with
    /// [`IssueRepositoryError::NotFound`] when the id is unknown.
    async fn update(&self, issue: &Issue) -> Result<(), IssueRepositoryError>;
}
