//! Driving port for login.
//!
//! Inbound adapters authenticate credentials through this port without
//! knowing which backing store issued the account.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials, Role, UserId};

use super::{FIXTURE_ADMIN_ID, FIXTURE_RESIDENT_ID};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// A development account accepted by the fixture credential contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureAccount {
    pub username: &'static str,
    pub display_name: &'static str,
    pub user_id: &'static str,
    pub roles: &'static [Role],
}

/// Password shared by every development account.
pub const FIXTURE_PASSWORD: &str = "password";

/// Which password, if any, unlocks the built-in accounts.
#[derive(Clone)]
pub enum AccountPassword {
    /// [`FIXTURE_PASSWORD`]; development builds only.
    Fixture,
    /// Operator-supplied secret.
    Configured(Zeroizing<String>),
    /// Every login is rejected.
    Disabled,
}

impl AccountPassword {
    /// Wrap an operator-supplied password.
    pub fn configured(password: impl Into<String>) -> Self {
        Self::Configured(Zeroizing::new(password.into()))
    }

    fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::Fixture => candidate == FIXTURE_PASSWORD,
            Self::Configured(secret) => candidate == secret.as_str(),
            Self::Disabled => false,
        }
    }
}

impl fmt::Debug for AccountPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fixture => "Fixture",
            Self::Configured(_) => "Configured(<redacted>)",
            Self::Disabled => "Disabled",
        })
    }
}

/// Accounts available without an external identity service.
pub const FIXTURE_ACCOUNTS: &[FixtureAccount] = &[
    FixtureAccount {
        username: "admin",
        display_name: "Administrator",
        user_id: FIXTURE_ADMIN_ID,
        roles: &[Role::Admin],
    },
    FixtureAccount {
        username: "resident",
        display_name: "Resident",
        user_id: FIXTURE_RESIDENT_ID,
        roles: &[],
    },
];

/// Resolve credentials against [`FIXTURE_ACCOUNTS`] under `password`.
pub fn fixture_account(
    credentials: &LoginCredentials,
    password: &AccountPassword,
) -> Option<&'static FixtureAccount> {
    if !password.accepts(credentials.password()) {
        return None;
    }
    FIXTURE_ACCOUNTS
        .iter()
        .find(|account| account.username == credentials.username())
}

/// In-memory authenticator for the development accounts, using
/// [`FIXTURE_PASSWORD`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = fixture_account(credentials, &AccountPassword::Fixture)
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        UserId::new(account.user_id)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    }
}
