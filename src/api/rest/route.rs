use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use serde::Deserialize;

use crate::api::rest::shipper_id;
use crate::error::AppError;
use crate::routing::resolver::{PositionFix, Resolution};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/route", post(resolve_route))
}

#[derive(Deserialize)]
pub struct ResolveRouteRequest {
    pub delivery_address: String,
    /// Device fix as granted by the client; absent means permission was
    /// denied unless `reuse_last_fix` is set.
    pub position: Option<Position>,
    #[serde(default)]
    pub reuse_last_fix: bool,
}

#[derive(Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

/// Resolution failures are outcomes, not errors: the response is always
/// 200 with a tagged body the client renders ("no route available",
/// "address not found", ...).
async fn resolve_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ResolveRouteRequest>,
) -> Result<Json<Resolution>, AppError> {
    let shipper = shipper_id(&headers)?;

    if payload.delivery_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "delivery_address must not be empty".to_string(),
        ));
    }

    let fix = match payload.position {
        Some(position) => PositionFix::Granted {
            lat: position.lat,
            lon: position.lon,
        },
        None if payload.reuse_last_fix => PositionFix::Reuse,
        None => PositionFix::Denied,
    };

    let start = Instant::now();
    let resolution = state
        .resolver
        .resolve(shipper, fix, &payload.delivery_address)
        .await;

    let outcome = match &resolution {
        Resolution::Ready { .. } => "ready",
        Resolution::Failed { .. } => "failed",
        Resolution::Superseded => "superseded",
    };
    state
        .metrics
        .route_resolutions_total
        .with_label_values(&[outcome])
        .inc();
    state
        .metrics
        .route_resolution_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());

    Ok(Json(resolution))
}
