//! Port wiring for the HTTP state.
//!
//! With a database pool every port is backed by Diesel. Without one, debug
//! builds fall back to the in-memory store and fixture accounts; release
//! builds refuse to start.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use community_issues::domain::IssueService;
use community_issues::domain::ports::{
    AccountPassword, FixtureIdentityProvider, FixtureLoginService,
};
use community_issues::inbound::http::session_config::BuildMode;
use community_issues::inbound::http::state::HttpState;
use community_issues::outbound::memory::InMemoryIssueRepository;
use community_issues::outbound::persistence::{
    DbPool, DieselIdentityProvider, DieselIssueRepository, DieselLoginService,
};

use super::{ServerConfig, StartupError};

fn diesel_state(pool: &DbPool, password: AccountPassword) -> HttpState {
    let service = Arc::new(IssueService::new(
        Arc::new(DieselIssueRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    ));
    HttpState::new(
        service.clone(),
        service,
        Arc::new(DieselLoginService::new(pool.clone(), password)),
        Arc::new(DieselIdentityProvider::new(pool.clone())),
    )
}

fn in_memory_state() -> HttpState {
    let service = Arc::new(IssueService::new(
        Arc::new(InMemoryIssueRepository::new()),
        Arc::new(DefaultClock),
    ));
    HttpState::new(
        service.clone(),
        service,
        Arc::new(FixtureLoginService),
        Arc::new(FixtureIdentityProvider),
    )
}

/// Choose adapters for the configured environment.
pub(crate) fn build_http_state(config: &ServerConfig) -> Result<web::Data<HttpState>, StartupError> {
    let state = match (&config.db_pool, config.mode) {
        (Some(pool), mode) => {
            if matches!(config.account_password, AccountPassword::Disabled) {
                warn!(?mode, "no account password configured; logins are disabled");
            }
            diesel_state(pool, config.account_password.clone())
        }
        (None, BuildMode::Debug) => {
            warn!("no database configured; serving issues from memory (dev only)");
            in_memory_state()
        }
        (None, BuildMode::Release) => {
            return Err(StartupError::Configuration(
                "a database URL is required in release builds".to_owned(),
            ));
        }
    };
    Ok(web::Data::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use community_issues::domain::{IssueListQuery, LoginCredentials};
    use community_issues::inbound::http::session_config::SessionSettings;
    use rstest::rstest;
    use std::net::SocketAddr;

    fn config(mode: BuildMode) -> ServerConfig {
        ServerConfig::new(
            SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
            },
            SocketAddr::from(([127, 0, 0, 1], 0)),
            mode,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn debug_without_database_serves_from_memory() {
        let state = build_http_state(&config(BuildMode::Debug)).expect("debug fallback");
        let listing = state
            .issues
            .list_issues(IssueListQuery::default())
            .await
            .expect("in-memory listing");
        assert!(listing.issues.is_empty());

        let creds = LoginCredentials::try_from_parts("admin", "password").expect("shape");
        assert!(state.login.authenticate(&creds).await.is_ok());
    }

    #[rstest]
    fn release_without_database_is_a_configuration_error() {
        let err = build_http_state(&config(BuildMode::Release))
            .err()
            .expect("release needs a database");
        assert!(matches!(err, StartupError::Configuration(_)));
    }

    #[rstest]
    #[case(BuildMode::Debug, "Fixture")]
    #[case(BuildMode::Release, "Disabled")]
    fn builtin_password_is_only_accepted_in_debug(
        #[case] mode: BuildMode,
        #[case] expected: &str,
    ) {
        assert_eq!(format!("{:?}", config(mode).account_password), expected);
    }

    #[rstest]
    fn operators_can_unlock_release_logins() {
        let config = config(BuildMode::Release).with_account_password("s3cret");
        assert_eq!(
            format!("{:?}", config.account_password),
            "Configured(<redacted>)"
        );
    }
}
