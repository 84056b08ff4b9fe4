//! Driving port for read-only issue use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Issue, IssueId, IssueListQuery, IssueListing};

/// Read side of the issue tracker; open to every caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueQuery: Send + Sync {
    /// Filtered, ordered issues plus dashboard counts over the whole store.
    async fn list_issues(&self, query: IssueListQuery) -> Result<IssueListing, Error>;

    /// A single issue, or `not_found`.
    async fn issue_detail(&self, id: IssueId) -> Result<Issue, Error>;
}
