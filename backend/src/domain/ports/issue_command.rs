//! Driving port for issue mutations and the forms that precede them.
//!
//! Every method receives the resolved [`Caller`] by value; implementations
//! decide authorisation from it and never consult the session.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Caller, Error, Issue, IssueCategory, IssueId, IssuePriority, IssueStatus, IssueSubmission,
};

/// Choices offered by the create form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueFormOptions {
    pub categories: Vec<IssueCategory>,
    pub priorities: Vec<IssuePriority>,
    pub statuses: Vec<IssueStatus>,
    pub default_status: IssueStatus,
}

impl Default for IssueFormOptions {
    fn default() -> Self {
        Self {
            categories: IssueCategory::ALL.to_vec(),
            priorities: IssuePriority::ALL.to_vec(),
            statuses: IssueStatus::ALL.to_vec(),
            default_status: IssueStatus::default(),
        }
    }
}

/// What the caller may change on an issue they are allowed to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditPermissions {
    pub can_set_status: bool,
}

/// An issue loaded for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableIssue {
    pub issue: Issue,
    pub permissions: EditPermissions,
}

/// Write side of the issue tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueCommand: Send + Sync {
    /// Options for the create form. Requires an authenticated caller.
    async fn create_form(&self, caller: Caller) -> Result<IssueFormOptions, Error>;

    /// Validate and persist a new issue owned by the caller, always `Open`.
    async fn create_issue(&self, submission: IssueSubmission, caller: Caller)
    -> Result<Issue, Error>;

    /// Load an issue for the edit form after checking owner-or-admin.
    async fn prepare_edit(&self, id: IssueId, caller: Caller) -> Result<EditableIssue, Error>;

    /// Apply an edit. Status changes only take effect for administrators.
    async fn edit_issue(
        &self,
        id: IssueId,
        submission: IssueSubmission,
        caller: Caller,
    ) -> Result<Issue, Error>;
}
