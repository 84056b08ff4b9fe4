//! The identity and capabilities attached to a single request.
//!
//! Inbound adapters resolve a [`Caller`] once per request and hand it to the
//! issue service by value. Business rules ask the caller about permissions
//! rather than inspecting role strings.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Issue, UserId};

/// Roles recognised by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Moderators who triage issues and may edit anything.
    Admin,
}

impl Role {
    /// Stable name as stored by the identity collaborator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
        }
    }

    const fn grants(self, permission: Permission) -> bool {
        match self {
            Self::Admin => matches!(
                permission,
                Permission::SetIssueStatus | Permission::EditAnyIssue
            ),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("admin") {
            Ok(Self::Admin)
        } else {
            Err(UnknownRole(s.to_owned()))
        }
    }
}

/// Capabilities checked by issue use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Change an issue's status.
    SetIssueStatus,
    /// Edit issues created by someone else.
    EditAnyIssue,
}

/// Set of roles held by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn insert(&mut self, role: Role) {
        self.0.insert(role);
    }

    /// Iterate the roles in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    fn grants(&self, permission: Permission) -> bool {
        self.iter().any(|role| role.grants(permission))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Who is making the request.
///
/// # Examples
/// ```
/// use community_issues::domain::{Caller, Permission, Role, RoleSet, UserId};
///
/// let admin = Caller::authenticated(UserId::random(), RoleSet::from_iter([Role::Admin]));
/// assert!(admin.has_permission(Permission::SetIssueStatus));
/// assert!(!Caller::Anonymous.has_permission(Permission::SetIssueStatus));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated { user_id: UserId, roles: RoleSet },
}

impl Caller {
    pub fn authenticated(user_id: UserId, roles: RoleSet) -> Self {
        Self::Authenticated { user_id, roles }
    }

    /// Identifier of an authenticated caller.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user_id, .. } => Some(*user_id),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            Self::Anonymous => false,
            Self::Authenticated { roles, .. } => roles.grants(permission),
        }
    }

    /// Owner or holder of [`Permission::EditAnyIssue`].
    pub fn may_edit(&self, issue: &Issue) -> bool {
        match self {
            Self::Anonymous => false,
            Self::Authenticated { user_id, .. } => {
                issue.created_by_user_id() == Some(*user_id)
                    || self.has_permission(Permission::EditAnyIssue)
            }
        }
    }
}
