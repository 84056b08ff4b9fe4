//! Issue use-cases.
//!
//! [`IssueService`] implements the [`IssueQuery`] and [`IssueCommand`] driving
//! ports on top of an [`IssueRepository`]. Callers arrive already resolved;
//! the service decides authorisation, validates submissions and stamps
//! creation metadata from the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    EditPermissions, EditableIssue, IssueCommand, IssueFormOptions, IssueQuery, IssueRepository,
    IssueRepositoryError,
};
use crate::domain::{
    Caller, Error, Issue, IssueFieldError, IssueId, IssueListQuery, IssueListing, IssueStatus,
    IssueStatusCounts, IssueSubmission, NewIssue, Permission, UserId,
};

/// Issue service implementing the issue driving ports.
#[derive(Clone)]
pub struct IssueService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> IssueService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

pub(crate) fn map_repository_error(error: IssueRepositoryError) -> Error {
    match error {
        IssueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("issue repository unavailable: {message}"))
        }
        IssueRepositoryError::Query { message } => {
            Error::internal(format!("issue repository error: {message}"))
        }
        IssueRepositoryError::Validation { message } => Error::invalid_request(message),
        IssueRepositoryError::NotFound { id } => issue_not_found(id),
    }
}

fn issue_not_found(id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("issue {id} not found"))
}

fn validation_failed(errors: &[IssueFieldError]) -> Error {
    Error::invalid_request("issue submission is invalid").with_details(json!({
        "fieldErrors": errors,
    }))
}

fn require_user(caller: &Caller) -> Result<UserId, Error> {
    caller
        .user_id()
        .ok_or_else(|| Error::unauthorized("login required"))
}

impl<R> IssueService<R>
where
    R: IssueRepository,
{
    async fn load(&self, id: IssueId) -> Result<Issue, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| issue_not_found(id))
    }

    async fn load_editable(&self, id: IssueId, caller: &Caller) -> Result<Issue, Error> {
        let user_id = require_user(caller)?;
        let issue = self.load(id).await?;
        if !caller.may_edit(&issue) {
            warn!(issue_id = %id, user_id = %user_id, "edit denied: not owner or admin");
            return Err(Error::forbidden("only the creator or an administrator may edit this issue"));
        }
        Ok(issue)
    }

    async fn status_counts(&self) -> Result<IssueStatusCounts, Error> {
        let mut counts = IssueStatusCounts {
            total: self
                .repository
                .count_total()
                .await
                .map_err(map_repository_error)?,
            ..IssueStatusCounts::default()
        };
        for status in IssueStatus::ALL {
            let count = self
                .repository
                .count_by_status(*status)
                .await
                .map_err(map_repository_error)?;
            counts.set(*status, count);
        }
        Ok(counts)
    }
}

#[async_trait]
impl<R> IssueQuery for IssueService<R>
where
    R: IssueRepository,
{
    async fn list_issues(&self, query: IssueListQuery) -> Result<IssueListing, Error> {
        let issues = self
            .repository
            .list(query)
            .await
            .map_err(map_repository_error)?;
        let counts = self.status_counts().await?;
        Ok(IssueListing {
            issues,
            counts,
            query,
        })
    }

    async fn issue_detail(&self, id: IssueId) -> Result<Issue, Error> {
        self.load(id).await
    }
}

#[async_trait]
impl<R> IssueCommand for IssueService<R>
where
    R: IssueRepository,
{
    async fn create_form(&self, caller: Caller) -> Result<IssueFormOptions, Error> {
        require_user(&caller)?;
        Ok(IssueFormOptions::default())
    }

    async fn create_issue(
        &self,
        submission: IssueSubmission,
        caller: Caller,
    ) -> Result<Issue, Error> {
        let user_id = require_user(&caller)?;
        let content = submission
            .validate()
            .map_err(|errors| validation_failed(&errors))?;

        let draft = NewIssue {
            content,
            status: IssueStatus::Open,
            created_at: self.clock.utc(),
            created_by_user_id: Some(user_id),
        };
        let issue = self
            .repository
            .create(draft)
            .await
            .map_err(map_repository_error)?;
        info!(issue_id = %issue.id(), user_id = %user_id, "issue created");
        Ok(issue)
    }

    async fn prepare_edit(&self, id: IssueId, caller: Caller) -> Result<EditableIssue, Error> {
        let issue = self.load_editable(id, &caller).await?;
        Ok(EditableIssue {
            issue,
            permissions: EditPermissions {
                can_set_status: caller.has_permission(Permission::SetIssueStatus),
            },
        })
    }

    async fn edit_issue(
        &self,
        id: IssueId,
        submission: IssueSubmission,
        caller: Caller,
    ) -> Result<Issue, Error> {
        require_user(&caller)?;
        if submission.id.is_some_and(|body_id| body_id != id.get()) {
            return Err(issue_not_found(id));
        }
        let mut issue = self.load_editable(id, &caller).await?;

        let can_set_status = caller.has_permission(Permission::SetIssueStatus);
        let mut errors = Vec::new();
        let content = submission.validate().map_err(|e| errors.extend(e)).ok();
        let status = if can_set_status {
            submission
                .parsed_status()
                .map_err(|e| errors.push(e))
                .ok()
                .flatten()
        } else {
            None
        };
        let Some(content) = content.filter(|_| errors.is_empty()) else {
            return Err(validation_failed(&errors));
        };

        issue.apply_content(content);
        if let Some(status) = status {
            issue.set_status(status);
        }
        self.repository
            .update(&issue)
            .await
            .map_err(map_repository_error)?;
        info!(
            issue_id = %id,
            status = %issue.status(),
            status_applied = status.is_some(),
            "issue edited"
        );
        Ok(issue)
    }
}

#[cfg(test)]
#[path = "issue_service_tests.rs"]
mod tests;
