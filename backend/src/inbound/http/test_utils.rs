//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::IssueService;
use crate::domain::ports::{FixtureIdentityProvider, FixtureLoginService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryIssueRepository;

/// Session middleware with a fresh key and `Secure` disabled for plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Handler state over an empty in-memory store and the fixture accounts.
pub fn fixture_state() -> HttpState {
    let service = Arc::new(IssueService::new(
        Arc::new(InMemoryIssueRepository::new()),
        Arc::new(mockable::DefaultClock),
    ));
    HttpState::new(
        service.clone(),
        service,
        Arc::new(FixtureLoginService),
        Arc::new(FixtureIdentityProvider),
    )
}
