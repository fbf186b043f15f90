mod api;
mod config;
mod error;
mod geo;
mod models;
mod observability;
mod routing;
mod shipments;
mod state;
mod store;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::routing::directions::GoogleDirections;
use crate::routing::geocoder::GeoapifyGeocoder;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    if config.geocoder_api_key.is_empty() || config.directions_api_key.is_empty() {
        tracing::warn!("geocoder or directions api key is empty; upstream calls will fail");
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|err| error::AppError::Internal(format!("failed to build http client: {err}")))?;

    let geocoder = Arc::new(GeoapifyGeocoder::new(
        http_client.clone(),
        config.geocoder_base_url.clone(),
        config.geocoder_api_key.clone(),
    ));
    let directions = Arc::new(GoogleDirections::new(
        http_client,
        config.directions_base_url.clone(),
        config.directions_api_key.clone(),
    ));

    let shared_state = Arc::new(state::AppState::new(geocoder, directions));
    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| error::AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| error::AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
