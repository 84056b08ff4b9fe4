//! Driven port resolving role membership for authenticated users.

use async_trait::async_trait;

use crate::domain::{Role, RoleSet, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The identity store could not be reached.
        Connection { message: String } =>
            "identity provider connection failed: {message}",
        /// The role lookup failed during execution.
        Query { message: String } =>
            "identity provider query failed: {message}",
    }
}

/// Port answering "which roles does this user hold?".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Roles held by `user_id`; unknown users hold none.
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, IdentityProviderError>;
}

/// Identity provider backing the development accounts.
///
/// Grants [`Role::Admin`] to [`FIXTURE_ADMIN_ID`] and nothing to anyone else.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

/// User id issued to the development `admin` account.
pub const FIXTURE_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// User id issued to the development `resident` account.
pub const FIXTURE_RESIDENT_ID: &str = "9b2f1c1e-4c3a-4d8e-9f41-1b6f3f0c2a77";

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, IdentityProviderError> {
        if user_id.to_string() == FIXTURE_ADMIN_ID {
            Ok(RoleSet::from_iter([Role::Admin]))
        } else {
            Ok(RoleSet::empty())
        }
    }
}
