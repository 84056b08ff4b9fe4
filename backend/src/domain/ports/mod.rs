//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`IssueQuery`, `IssueCommand`, `LoginService`) are called by
//! inbound adapters. Driven ports (`IssueRepository`, `IdentityProvider`) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod issue_command;
mod issue_query;
mod issue_repository;
mod login_service;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FIXTURE_ADMIN_ID, FIXTURE_RESIDENT_ID, FixtureIdentityProvider, IdentityProvider,
    IdentityProviderError,
};
#[cfg(test)]
pub use issue_command::MockIssueCommand;
pub use issue_command::{EditPermissions, EditableIssue, IssueCommand, IssueFormOptions};
#[cfg(test)]
pub use issue_query::MockIssueQuery;
pub use issue_query::IssueQuery;
#[cfg(test)]
pub use issue_repository::MockIssueRepository;
pub use issue_repository::{IssueRepository, IssueRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    AccountPassword, FIXTURE_ACCOUNTS, FIXTURE_PASSWORD, FixtureAccount, FixtureLoginService,
    LoginService, fixture_account,
};
