//! In-memory `IssueRepository` for development and tests.
//!
//! Issues live in a `BTreeMap` keyed by id behind a tokio `Mutex`; ids are
//! handed out from a monotonically increasing counter and never reused.
//! Contents vanish when the process exits.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{IssueRepository, IssueRepositoryError};
use crate::domain::{Issue, IssueId, IssueListQuery, IssueSortOrder, IssueStatus, NewIssue};

#[derive(Debug, Default)]
struct Store {
    issues: BTreeMap<IssueId, Issue>,
    last_id: i64,
}

/// Ephemeral implementation of the [`IssueRepository`] port.
#[derive(Debug, Default)]
pub struct InMemoryIssueRepository {
    store: Mutex<Store>,
}

impl InMemoryIssueRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(sort: IssueSortOrder, a: &Issue, b: &Issue) -> Ordering {
    let primary = match sort {
        IssueSortOrder::PriorityDesc => b.priority().cmp(&a.priority()),
        IssueSortOrder::PriorityAsc => a.priority().cmp(&b.priority()),
        IssueSortOrder::DateAsc => a.created_at().cmp(&b.created_at()),
        IssueSortOrder::DateDesc => b.created_at().cmp(&a.created_at()),
    };
    primary.then_with(|| a.id().cmp(&b.id()))
}

fn count(value: usize) -> Result<u64, IssueRepositoryError> {
    u64::try_from(value).map_err(|_| IssueRepositoryError::query("issue count overflow"))
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn list(&self, query: IssueListQuery) -> Result<Vec<Issue>, IssueRepositoryError> {
        let store = self.store.lock().await;
        let mut issues: Vec<Issue> = store
            .issues
            .values()
            .filter(|issue| query.category.is_none_or(|c| issue.category() == c))
            .cloned()
            .collect();
        issues.sort_by(|a, b| compare(query.sort, a, b));
        Ok(issues)
    }

    async fn count_total(&self) -> Result<u64, IssueRepositoryError> {
        count(self.store.lock().await.issues.len())
    }

    async fn count_by_status(&self, status: IssueStatus) -> Result<u64, IssueRepositoryError> {
        let store = self.store.lock().await;
        count(
            store
                .issues
                .values()
                .filter(|issue| issue.status() == status)
                .count(),
        )
    }

    async fn find_by_id(&self, id: IssueId) -> Result<Option<Issue>, IssueRepositoryError> {
        Ok(self.store.lock().await.issues.get(&id).cloned())
    }

    async fn create(&self, issue: NewIssue) -> Result<Issue, IssueRepositoryError> {
        let mut store = self.store.lock().await;
        let next = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| IssueRepositoryError::query("issue id space exhausted"))?;
        let id = IssueId::new(next).map_err(|err| IssueRepositoryError::query(err.to_string()))?;
        store.last_id = next;
        let created = Issue::new(id, issue);
        store.issues.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, issue: &Issue) -> Result<(), IssueRepositoryError> {
        let mut store = self.store.lock().await;
        let stored = store
            .issues
            .get_mut(&issue.id())
            .ok_or_else(|| IssueRepositoryError::not_found(issue.id().get()))?;
        let mut updated = stored.clone();
        updated.apply_content(crate::domain::IssueContent {
            title: issue.title().clone(),
            description: issue.description().clone(),
            category: issue.category(),
            priority: issue.priority(),
        });
        updated.set_status(issue.status());
        *stored = updated;
        Ok(())
    }
}
