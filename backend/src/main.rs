//! Journal backend entry-point: loads settings, prepares the entry store and
//! auth guard, then serves HTTP until shutdown.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use journal_backend::config::AppSettings;
use journal_backend::inbound::http::health::HealthState;
use journal_backend::inbound::http::pages::SiteRoot;
use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let config = settings.resolve().wrap_err("invalid configuration")?;

    let http_state = build_http_state(&config)
        .await
        .wrap_err("failed to prepare service dependencies")?;

    let health_state = web::Data::new(HealthState::new());
    let server_config = ServerConfig::new(http_state, config.host.as_str(), config.port)
        .with_site(SiteRoot::new(config.static_dir.clone()));
    let server = create_server(health_state.clone(), server_config)
        .wrap_err_with(|| format!("failed to bind {}:{}", config.host, config.port))?;

    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
