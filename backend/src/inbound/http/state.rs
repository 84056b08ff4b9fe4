//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! tests can swap in doubles without I/O.

use std::sync::Arc;

use crate::domain::ports::{IdentityProvider, IssueCommand, IssueQuery, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub issues: Arc<dyn IssueQuery>,
    pub issue_commands: Arc<dyn IssueCommand>,
    pub login: Arc<dyn LoginService>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl HttpState {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use community_issues::domain::IssueService;
    /// use community_issues::domain::ports::{FixtureIdentityProvider, FixtureLoginService};
    /// use community_issues::inbound::http::state::HttpState;
    /// use community_issues::outbound::memory::InMemoryIssueRepository;
    ///
    /// let service = Arc::new(IssueService::new(
    ///     Arc::new(InMemoryIssueRepository::new()),
    ///     Arc::new(mockable::DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     service.clone(),
    ///     service,
    ///     Arc::new(FixtureLoginService),
    ///     Arc::new(FixtureIdentityProvider),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        issues: Arc<dyn IssueQuery>,
        issue_commands: Arc<dyn IssueCommand>,
        login: Arc<dyn LoginService>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            issues,
            issue_commands,
            login,
            identity,
        }
    }
}
