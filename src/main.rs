use std::net::SocketAddr;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use request_log_gateway::{config::AppConfig, create_app, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.telemetry)?;
    info!("Configuration loaded successfully");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let request_log_enabled = config.request_log.enabled;

    let app = create_app(AppState::new(config));
    let listener = TcpListener::bind(&addr).await?;

    info!(
        address = %addr,
        request_log = request_log_enabled,
        "request-log-gateway starting"
    );

    // Peer addresses feed the `ip` field of the request log.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
