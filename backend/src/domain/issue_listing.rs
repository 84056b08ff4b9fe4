//! Listing parameters and the dashboard summary returned with them.

use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use super::{Issue, IssueCategory, IssueStatus};

/// Ordering applied to the issue list.
///
/// Ties are broken by ascending issue id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueSortOrder {
    PriorityDesc,
    PriorityAsc,
    DateAsc,
    #[default]
    DateDesc,
}

impl IssueSortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriorityDesc => "priority_desc",
            Self::PriorityAsc => "priority_asc",
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
        }
    }

    /// Parse a sort key, falling back to [`IssueSortOrder::DateDesc`] for
    /// anything unrecognised.
    ///
    /// # Examples
    /// ```
    /// use community_issues::domain::IssueSortOrder;
    ///
    /// assert_eq!(IssueSortOrder::from_query(Some("priority_desc")), IssueSortOrder::PriorityDesc);
    /// assert_eq!(IssueSortOrder::from_query(Some("bogus")), IssueSortOrder::DateDesc);
    /// assert_eq!(IssueSortOrder::from_query(None), IssueSortOrder::DateDesc);
    /// ```
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for IssueSortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "priority_desc" => Ok(Self::PriorityDesc),
            "priority_asc" => Ok(Self::PriorityAsc),
            "date_asc" => Ok(Self::DateAsc),
            "date_desc" => Ok(Self::DateDesc),
            _ => Err(()),
        }
    }
}

/// Filter and ordering for a listing request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueListQuery {
    pub category: Option<IssueCategory>,
    pub sort: IssueSortOrder,
}

impl IssueListQuery {
    /// Build a query from raw query-string values. Unknown categories mean
    /// "no filter"; unknown sort keys mean date descending.
    pub fn from_raw(sort_order: Option<&str>, category_filter: Option<&str>) -> Self {
        Self {
            category: category_filter
                .filter(|raw| !raw.trim().is_empty())
                .and_then(|raw| raw.parse().ok()),
            sort: IssueSortOrder::from_query(sort_order),
        }
    }
}

/// Dashboard counters computed over every stored issue, ignoring filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueStatusCounts {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl IssueStatusCounts {
    /// Record the count for one status.
    pub fn set(&mut self, status: IssueStatus, count: u64) {
        match status {
            IssueStatus::Open => self.open = count,
            IssueStatus::InProgress => self.in_progress = count,
            IssueStatus::Resolved => self.resolved = count,
            IssueStatus::Closed => self.closed = count,
        }
    }
}

/// Result of a listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueListing {
    pub issues: Vec<Issue>,
    pub counts: IssueStatusCounts,
    pub query: IssueListQuery,
}
