//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use community_issues::domain::ports::AccountPassword;
use community_issues::inbound::http::session_config::{BuildMode, SessionSettings};
use community_issues::outbound::persistence::DbPool;

/// Everything the server needs besides the handlers themselves.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) mode: BuildMode,
    pub(crate) account_password: AccountPassword,
}

impl ServerConfig {
    /// Build a configuration without a database; see
    /// [`ServerConfig::with_db_pool`].
    ///
    /// Debug builds accept the fixture password for the built-in accounts;
    /// release builds reject logins until
    /// [`ServerConfig::with_account_password`] supplies one.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, mode: BuildMode) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            mode,
            account_password: match mode {
                BuildMode::Debug => AccountPassword::Fixture,
                BuildMode::Release => AccountPassword::Disabled,
            },
        }
    }

    /// Unlock the built-in accounts with an operator-supplied password.
    #[must_use]
    pub fn with_account_password(mut self, password: &str) -> Self {
        self.account_password = AccountPassword::configured(password);
        self
    }

    /// Serve issues and identities from PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
