//! Domain primitives, use-cases and ports.
//!
//! Purpose: define the issue entity and its invariants, the caller model used
//! for authorisation, and the services that inbound adapters drive.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Issue and its field types: the sole domain entity.
//! - Caller / Role / Permission: resolved request identity.
//! - IssueService: implementation of the issue driving ports.

pub mod auth;
pub mod caller;
pub mod error;
pub mod issue;
pub mod issue_listing;
pub mod issue_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::caller::{Caller, Permission, Role, RoleSet, UnknownRole};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::issue::{
    FieldErrorCode, InvalidIssueId, Issue, IssueCategory, IssueContent, IssueDescription,
    IssueField, IssueFieldError, IssueId, IssuePriority, IssueStatus, IssueSubmission, IssueTitle,
    NewIssue, TITLE_MAX, UnknownVariant,
};
pub use self::issue_listing::{IssueListQuery, IssueListing, IssueSortOrder, IssueStatusCounts};
pub use self::issue_service::IssueService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserValidationError};
