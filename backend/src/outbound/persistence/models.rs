//! Diesel row types. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{issues, user_roles, users};

/// A row read from `issues`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IssueRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by_user_id: Option<Uuid>,
}

/// Insert payload for `issues`. `priority_rank` is generated by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issues)]
pub(crate) struct NewIssueRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub created_by_user_id: Option<Uuid>,
}

/// Editable columns of `issues`; creation metadata is deliberately absent.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = issues)]
pub(crate) struct IssueChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub display_name: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct NewUserRoleRow<'a> {
    pub user_id: Uuid,
    pub role: &'a str,
}
