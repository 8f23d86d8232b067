//! Backend entry-point: configuration, migrations, and server startup.

use actix_web::web;
use mockable::DefaultEnv;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{
    build_http_state, create_server, run_pending_migrations, AppConfig, BuildMode,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::default();
    let config = AppConfig::from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    run_pending_migrations(config.database_url.clone()).await?;

    let pool = DbPool::new(PoolConfig::new(config.database_url.as_str()))
        .await
        .map_err(std::io::Error::other)?;
    let http_state = build_http_state(pool, config.storage.clone());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config, http_state)?;
    server.await
}
