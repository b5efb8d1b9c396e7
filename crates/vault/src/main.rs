//! `field-vault` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing, optional OTLP export).
//! 3. Resolve the field key secrets and derive the current key once.
//! 4. Build the Axum router and start the HTTP server.

mod config;
mod crypto;
mod server;
mod telemetry;

use anyhow::Result;
use tracing::info;

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level, cfg.otel_exporter_otlp_endpoint.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        app_env = ?cfg.app_env,
        listen_port = cfg.listen_port,
        "field-vault starting"
    );

    // -----------------------------------------------------------------------
    // 3. Field keys
    // -----------------------------------------------------------------------
    let state = AppState::new(
        cfg.current_secret(),
        cfg.previous_secret(),
        cfg.minimum_age_years,
    );
    state.current_key.get();
    if let Some(previous) = &state.previous_key {
        previous.get();
        info!("previous field key loaded; rotation enabled");
    }

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
