//! PostgreSQL-backed `IssueRepository` using Diesel.
//!
//! Enumerations are stored as their PascalCase names. Priority ordering uses
//! the generated `priority_rank` column so `Low < Medium < High < Critical`
//! holds in SQL as it does in the domain.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{IssueRepository, IssueRepositoryError};
use crate::domain::{
    Issue, IssueContent, IssueDescription, IssueId, IssueListQuery, IssueSortOrder, IssueStatus,
    IssueTitle, NewIssue, UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, failure_message};
use super::models::{IssueChangeset, IssueRow, NewIssueRow};
use super::pool::{DbPool, PoolError};
use super::schema::issues;

/// Diesel-backed implementation of the [`IssueRepository`] port.
#[derive(Clone)]
pub struct DieselIssueRepository {
    pool: DbPool,
}

impl DieselIssueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IssueRepositoryError {
    IssueRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> IssueRepositoryError {
    let failure = classify_diesel_error(&error);
    let message = failure_message(failure);
    match failure {
        DieselFailure::Connection => IssueRepositoryError::connection(message),
        DieselFailure::Validation => IssueRepositoryError::validation(message),
        DieselFailure::Query => IssueRepositoryError::query(message),
    }
}

fn count_from_db(count: i64) -> Result<u64, IssueRepositoryError> {
    u64::try_from(count).map_err(|_| IssueRepositoryError::query("negative row count"))
}

/// Rebuild a domain issue from a stored row.
///
/// Rows that no longer satisfy the domain invariants are reported as query
/// failures rather than silently repaired.
fn row_to_issue(row: IssueRow) -> Result<Issue, IssueRepositoryError> {
    let row_id = row.id;
    let corrupt = |detail: String| {
        warn!(issue_id = row_id, %detail, "stored issue violates domain invariants");
        IssueRepositoryError::query(format!("stored issue {row_id} is invalid: {detail}"))
    };

    let id = IssueId::new(row.id).map_err(|err| corrupt(err.to_string()))?;
    let content = IssueContent {
        title: IssueTitle::new(&row.title).map_err(|err| corrupt(err.message))?,
        description: IssueDescription::new(&row.description).map_err(|err| corrupt(err.message))?,
        category: row.category.parse().map_err(|err| corrupt(format!("{err}")))?,
        priority: row.priority.parse().map_err(|err| corrupt(format!("{err}")))?,
    };
    let status: IssueStatus = row.status.parse().map_err(|err| corrupt(format!("{err}")))?;

    Ok(Issue::new(
        id,
        NewIssue {
            content,
            status,
            created_at: row.created_at,
            created_by_user_id: row.created_by_user_id.map(UserId::from_uuid),
        },
    ))
}

#[async_trait]
impl IssueRepository for DieselIssueRepository {
    async fn list(&self, query: IssueListQuery) -> Result<Vec<Issue>, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = issues::table.select(IssueRow::as_select()).into_boxed();
        if let Some(category) = query.category {
            statement = statement.filter(issues::category.eq(category.as_str()));
        }
        statement = match query.sort {
            IssueSortOrder::PriorityDesc => statement.order(issues::priority_rank.desc()),
            IssueSortOrder::PriorityAsc => statement.order(issues::priority_rank.asc()),
            IssueSortOrder::DateAsc => statement.order(issues::created_at.asc()),
            IssueSortOrder::DateDesc => statement.order(issues::created_at.desc()),
        };

        let rows: Vec<IssueRow> = statement
            .then_order_by(issues::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_issue).collect()
    }

    async fn count_total(&self) -> Result<u64, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = issues::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_from_db(count)
    }

    async fn count_by_status(&self, status: IssueStatus) -> Result<u64, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = issues::table
            .filter(issues::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_from_db(count)
    }

    async fn find_by_id(&self, id: IssueId) -> Result<Option<Issue>, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IssueRow> = issues::table
            .find(id.get())
            .select(IssueRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_issue).transpose()
    }

    async fn create(&self, issue: NewIssue) -> Result<Issue, IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewIssueRow {
            title: issue.content.title.as_ref(),
            description: issue.content.description.as_ref(),
            category: issue.content.category.as_str(),
            priority: issue.content.priority.as_str(),
            status: issue.status.as_str(),
            created_at: issue.created_at,
            created_by_user_id: issue.created_by_user_id.map(|id| *id.as_uuid()),
        };
        let row: IssueRow = diesel::insert_into(issues::table)
            .values(&new_row)
            .returning(IssueRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_issue(row)
    }

    async fn update(&self, issue: &Issue) -> Result<(), IssueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = IssueChangeset {
            title: issue.title().as_ref(),
            description: issue.description().as_ref(),
            category: issue.category().as_str(),
            priority: issue.priority().as_str(),
            status: issue.status().as_str(),
        };
        let updated = diesel::update(issues::table.find(issue.id().get()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(IssueRepositoryError::not_found(issue.id().get()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use crate::domain::{IssueCategory, IssuePriority};

    #[fixture]
    fn row() -> IssueRow {
        IssueRow {
            id: 12,
            title: "Overflowing bins".to_owned(),
            description: "Collection missed twice".to_owned(),
            category: "Sanitation".to_owned(),
            priority: "High".to_owned(),
            status: "InProgress".to_owned(),
            created_at: Utc::now(),
            created_by_user_id: Some(Uuid::new_v4()),
        }
    }

    #[rstest]
    fn rows_convert_to_issues(row: IssueRow) {
        let owner = row.created_by_user_id;
        let issue = row_to_issue(row).expect("valid row");
        assert_eq!(issue.id().get(), 12);
        assert_eq!(issue.category(), IssueCategory::Sanitation);
        assert_eq!(issue.priority(), IssuePriority::High);
        assert_eq!(issue.status(), IssueStatus::InProgress);
        assert_eq!(issue.created_by_user_id().map(|id| *id.as_uuid()), owner);
    }

    #[rstest]
    fn rows_with_unknown_enums_are_query_errors(mut row: IssueRow) {
        row.status = "Archived".to_owned();
        let err = row_to_issue(row).expect_err("unknown status");
        assert!(matches!(err, IssueRepositoryError::Query { .. }));
    }

    #[rstest]
    fn rows_with_blank_titles_are_query_errors(mut row: IssueRow) {
        row.title = "  ".to_owned();
        assert!(row_to_issue(row).is_err());
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, IssueRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn not_found_diesel_errors_map_to_query_errors() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, IssueRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(-1, false)]
    #[case(0, true)]
    #[case(42, true)]
    fn counts_must_be_non_negative(#[case] raw: i64, #[case] ok: bool) {
        assert_eq!(count_from_db(raw).is_ok(), ok);
    }
}
