//! Application settings loaded via OrthoConfig.
//!
//! Values come from `--flags`, `ISSUES_*` environment variables or a
//! configuration file. `DATABASE_URL` and `PORT` are honoured as fallbacks
//! for deployments that only set the conventional names.

use std::net::{IpAddr, SocketAddr};

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const PORT_ENV: &str = "PORT";

/// Server and persistence settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ISSUES")]
pub struct AppSettings {
    /// PostgreSQL connection string. Falls back to `DATABASE_URL`.
    pub database_url: Option<String>,
    /// Interface to bind.
    pub bind_host: Option<String>,
    /// Listen port. Falls back to `PORT`.
    pub port: Option<u16>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving. Defaults to `true`.
    pub run_migrations: Option<bool>,
    /// Password for the built-in accounts. Without it, release builds reject
    /// every login.
    pub account_password: Option<String>,
}

/// Settings values that cannot be turned into a listen address.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind host '{value}'")]
    InvalidBindHost { value: String },
    #[error("invalid {name}='{value}'; expected a port number")]
    InvalidPort { name: &'static str, value: String },
}

impl AppSettings {
    /// The configured database URL, ignoring blank values.
    pub fn database_url<E: Env>(&self, env: &E) -> Option<String> {
        let non_blank = |url: &String| !url.trim().is_empty();
        self.database_url
            .clone()
            .filter(non_blank)
            .or_else(|| env.string(DATABASE_URL_ENV).filter(non_blank))
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the host is not an IP address or the
    /// `PORT` fallback is not a number.
    pub fn bind_addr<E: Env>(&self, env: &E) -> Result<SocketAddr, SettingsError> {
        let host = self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidBindHost {
            value: host.to_owned(),
        })?;
        let port = match (self.port, env.string(PORT_ENV)) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw.trim().parse().map_err(|_| SettingsError::InvalidPort {
                name: PORT_ENV,
                value: raw,
            })?,
            (None, None) => DEFAULT_PORT,
        };
        Ok(SocketAddr::new(ip, port))
    }

    /// Pool size, at least one.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// The configured account password, ignoring blank values.
    pub fn account_password(&self) -> Option<&str> {
        self.account_password
            .as_deref()
            .filter(|password| !password.trim().is_empty())
    }

    /// Whether to apply pending migrations at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    //! Settings loading and fallback resolution.

    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use mockable::MockEnv;
    use rstest::rstest;

    const KEYS: [&str; 6] = [
        "ISSUES_DATABASE_URL",
        "ISSUES_BIND_HOST",
        "ISSUES_PORT",
        "ISSUES_DB_MAX_CONNECTIONS",
        "ISSUES_RUN_MIGRATIONS",
        "ISSUES_ACCOUNT_PASSWORD",
    ];

    fn load(args: &[&str]) -> AppSettings {
        let argv = std::iter::once(OsString::from("community-issues"))
            .chain(args.iter().map(OsString::from));
        AppSettings::load_from_iter(argv).expect("settings load")
    }

    fn env_with(vars: &[(&'static str, &str)]) -> MockEnv {
        let vars: HashMap<&'static str, String> = vars
            .iter()
            .map(|(name, value)| (*name, (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |name| vars.get(name).cloned());
        env
    }

    #[rstest]
    fn defaults_apply_without_configuration() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));
        let settings = load(&[]);
        let env = env_with(&[]);

        assert!(settings.run_migrations());
        assert_eq!(settings.account_password(), None);
        assert_eq!(settings.database_url(&env), None);
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(
            settings.bind_addr(&env),
            Ok(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
        );
    }

    #[rstest]
    fn prefixed_environment_overrides_defaults() {
        let _guard = lock_env([
            ("ISSUES_DATABASE_URL", Some("postgres://db/issues".to_owned())),
            ("ISSUES_BIND_HOST", Some("127.0.0.1".to_owned())),
            ("ISSUES_PORT", Some("9090".to_owned())),
            ("ISSUES_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("ISSUES_RUN_MIGRATIONS", Some("false".to_owned())),
            ("ISSUES_ACCOUNT_PASSWORD", Some("s3cret".to_owned())),
        ]);
        let settings = load(&[]);
        let env = env_with(&[("DATABASE_URL", "postgres://ignored"), ("PORT", "1")]);

        assert!(!settings.run_migrations());
        assert_eq!(settings.account_password(), Some("s3cret"));
        assert_eq!(
            settings.database_url(&env).as_deref(),
            Some("postgres://db/issues")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(
            settings.bind_addr(&env),
            Ok(SocketAddr::from(([127, 0, 0, 1], 9090)))
        );
    }

    #[rstest]
    fn conventional_variables_are_fallbacks() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));
        let settings = load(&[]);
        let env = env_with(&[("DATABASE_URL", "postgres://fallback"), ("PORT", "5000")]);

        assert_eq!(
            settings.database_url(&env).as_deref(),
            Some("postgres://fallback")
        );
        assert_eq!(settings.bind_addr(&env).map(|a| a.port()), Ok(5000));
    }

    #[rstest]
    #[case(Some("not-an-ip"), None, "invalid bind host 'not-an-ip'")]
    #[case(None, Some("eighty"), "invalid PORT='eighty'; expected a port number")]
    fn malformed_listen_settings_are_rejected(
        #[case] host: Option<&str>,
        #[case] port: Option<&'static str>,
        #[case] message: &str,
    ) {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));
        let mut settings = load(&[]);
        settings.bind_host = host.map(str::to_owned);
        let env = match port {
            Some(port) => env_with(&[("PORT", port)]),
            None => env_with(&[]),
        };

        let err = settings.bind_addr(&env).expect_err("listen settings invalid");
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    fn blank_database_urls_are_ignored() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));
        let mut settings = load(&[]);
        settings.database_url = Some("   ".to_owned());
        assert_eq!(settings.database_url(&env_with(&[])), None);
    }

    #[rstest]
    fn blank_setting_defers_to_conventional_database_url() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));
        let mut settings = load(&[]);
        settings.database_url = Some("  ".to_owned());
        let env = env_with(&[("DATABASE_URL", "postgres://real")]);

        assert_eq!(
            settings.database_url(&env).as_deref(),
            Some("postgres://real")
        );
    }

    #[rstest]
    fn migrations_run_unless_disabled() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));
        let mut settings = load(&[]);
        assert_eq!(settings.run_migrations, None);
        assert!(settings.run_migrations());

        settings.run_migrations = Some(false);
        assert!(!settings.run_migrations());
    }
}
