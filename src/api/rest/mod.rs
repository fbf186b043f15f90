pub mod orders;
pub mod route;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(orders::router())
        .merge(route::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// The identity provider has already authenticated the shipper; its id
/// arrives on every request as the `x-shipper-id` header. This service
/// only reads it.
pub(crate) fn shipper_id(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get("x-shipper-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing x-shipper-id header".to_string()))?;

    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid shipper id: {raw}")))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    orders: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        orders: state.orders.len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
