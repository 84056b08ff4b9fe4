//! Server entry point: loads settings, prepares persistence and serves the
//! issue tracker over HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use community_issues::inbound::http::health::HealthState;
use community_issues::inbound::http::session_config::{
    BuildMode, fingerprint::key_fingerprint, session_settings_from_env,
};
use community_issues::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use community_issues::settings::AppSettings;

use server::{ServerConfig, StartupError, create_server};

async fn connect(settings: &AppSettings, database_url: &str) -> Result<DbPool, StartupError> {
    if settings.run_migrations() {
        run_pending_migrations(database_url).await?;
    }
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await?;
    Ok(pool)
}

async fn build_config(settings: &AppSettings) -> Result<ServerConfig, StartupError> {
    let env = DefaultEnv::new();
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&env, mode)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );
    let bind_addr = settings.bind_addr(&env)?;
    let mut config = ServerConfig::new(session, bind_addr, mode);
    if let Some(password) = settings.account_password() {
        config = config.with_account_password(password);
    }

    match settings.database_url(&env) {
        Some(url) => Ok(config.with_db_pool(connect(settings, &url).await?)),
        None => Ok(config),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let config = build_config(&settings)
        .await
        .wrap_err("invalid startup configuration")?;
    let bind_addr = config.bind_addr;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("failed to start server")?;
    info!(%bind_addr, "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated with an error")
}
