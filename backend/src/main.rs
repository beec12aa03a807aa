//! Backend entry-point: loads settings, prepares the database, and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use devevent::inbound::http::health::HealthState;
use devevent::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use devevent::settings::ServerSettings;
use server::{AnalyticsTarget, ServerConfig, create_server};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

async fn connect_database(database_url: &str, settings: &ServerSettings) -> std::io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let mut pool_config = PoolConfig::new(database_url);
    if let Some(max_size) = settings.db_max_connections {
        pool_config = pool_config.with_max_size(max_size);
    }
    DbPool::new(pool_config)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))
}

fn build_server_config(settings: &ServerSettings) -> std::io::Result<ServerConfig> {
    let to_io = |err: devevent::settings::SettingsError| std::io::Error::other(err.to_string());
    let analytics = settings.analytics().map_err(to_io)?.map(|(host, api_key)| AnalyticsTarget {
        host,
        api_key,
        timeout: settings.analytics_timeout(),
    });
    Ok(ServerConfig::new(settings.bind_addr().map_err(to_io)?)
        .with_image_host(settings.image_host().map_err(to_io)?)
        .with_analytics(analytics))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let settings = ServerSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let mut config = build_server_config(&settings)?;

    if let Some(database_url) = settings.database_url.as_deref() {
        let pool = connect_database(database_url, &settings).await?;
        config = config.with_db_pool(pool);
    }

    info!(bind_addr = %config.bind_addr, "starting devevent server");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
