use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use uuid::Uuid;

use crate::api::rest::shipper_id;
use crate::error::AppError;
use crate::models::order::Order;
use crate::shipments;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders/available", get(list_available))
        .route("/orders/active", get(list_active))
        .route("/orders/:id/claim", post(claim_order))
        .route("/orders/:id/complete", post(complete_order))
}

async fn list_available(State(state): State<Arc<AppState>>) -> Json<Vec<Order>> {
    Json(shipments::available_orders(&state.orders))
}

async fn list_active(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Order>>, AppError> {
    let shipper = shipper_id(&headers)?;
    Ok(Json(shipments::active_deliveries(&state.orders, shipper)))
}

async fn claim_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Order>, AppError> {
    let shipper = shipper_id(&headers)?;

    match shipments::claim(&state.orders, id, shipper) {
        Ok(order) => {
            state
                .metrics
                .claims_total
                .with_label_values(&["success"])
                .inc();
            Ok(Json(order))
        }
        Err(err) => {
            let outcome = match &err {
                AppError::Conflict(_) => "conflict",
                AppError::NotFound(_) => "not_found",
                _ => "error",
            };
            state
                .metrics
                .claims_total
                .with_label_values(&[outcome])
                .inc();
            Err(err)
        }
    }
}

async fn complete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Order>, AppError> {
    let shipper = shipper_id(&headers)?;

    match shipments::complete(&state.orders, id, shipper) {
        Ok(order) => {
            state
                .metrics
                .completions_total
                .with_label_values(&["success"])
                .inc();
            Ok(Json(order))
        }
        Err(err) => {
            let outcome = match &err {
                AppError::Conflict(_) => "conflict",
                AppError::Unauthorized(_) => "unauthorized",
                AppError::NotFound(_) => "not_found",
                _ => "error",
            };
            state
                .metrics
                .completions_total
                .with_label_values(&[outcome])
                .inc();
            Err(err)
        }
    }
}
