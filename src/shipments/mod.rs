use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{Order, ShipmentStatus};
use crate::store::OrderStore;

/// Takes ownership of an unclaimed order for `shipper_id`.
///
/// The whole transition is one conditional write against the store: it
/// succeeds only while the order is still `AwaitingPickup`, so two shippers
/// racing for the same order get exactly one success and one `Conflict`.
pub fn claim(store: &OrderStore, order_id: Uuid, shipper_id: Uuid) -> Result<Order, AppError> {
    let order = store
        .conditional_update(order_id, ShipmentStatus::AwaitingPickup, |order| {
            order.status = ShipmentStatus::InTransit;
            order.assigned_shipper = Some(shipper_id);
        })
        .map_err(|err| match err {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("order {order_id} already claimed"))
            }
            other => other,
        })?;

    info!(order_id = %order_id, shipper_id = %shipper_id, "order claimed");
    Ok(order)
}

/// Marks an in-transit order delivered. Only the shipper recorded at claim
/// time may complete it; the store write is still conditioned on the order
/// being `InTransit` so a stale client replaying a finished delivery is
/// rejected rather than applied twice.
pub fn complete(store: &OrderStore, order_id: Uuid, shipper_id: Uuid) -> Result<Order, AppError> {
    let current = store.get(order_id)?;
    if current.assigned_shipper != Some(shipper_id) {
        return Err(AppError::Unauthorized(format!(
            "order {order_id} is not assigned to shipper {shipper_id}"
        )));
    }

    let order = store
        .conditional_update(order_id, ShipmentStatus::InTransit, |order| {
            order.status = ShipmentStatus::Delivered;
        })
        .map_err(|err| match err {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("order {order_id} is not in transit"))
            }
            other => other,
        })?;

    info!(order_id = %order_id, shipper_id = %shipper_id, "delivery completed");
    Ok(order)
}

/// Everything a shipper may still claim.
pub fn available_orders(store: &OrderStore) -> Vec<Order> {
    store.list_by_status(ShipmentStatus::AwaitingPickup)
}

/// The caller's deliveries currently on the road.
pub fn active_deliveries(store: &OrderStore, shipper_id: Uuid) -> Vec<Order> {
    store
        .list_by_status(ShipmentStatus::InTransit)
        .into_iter()
        .filter(|order| order.assigned_shipper == Some(shipper_id))
        .collect()
}
