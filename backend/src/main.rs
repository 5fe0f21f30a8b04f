//! Backend entry-point: loads settings, wires persistence and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use realestatehub::inbound::http::health::HealthState;
use server::{ServerConfig, Settings, create_server};

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

    let settings = Settings::load().map_err(std::io::Error::other)?;
    let config = ServerConfig::from_settings(&settings)
        .await
        .map_err(std::io::Error::other)?;
    info!(addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
