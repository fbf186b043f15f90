use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a shipment. Transitions only move forward and never skip
/// a state: `AwaitingPickup -> InTransit -> Delivered`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    AwaitingPickup,
    InTransit,
    Delivered,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
}

/// One shipment record. Created by the upstream order-placement process;
/// this service mutates it exactly twice (claim, then completion) and
/// never deletes it.
///
/// `assigned_shipper` is `None` while the order awaits pickup, set exactly
/// once at claim time, and never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer_id: String,
    pub delivery_address: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub items: Vec<OrderItem>,
    pub total_amount: i64,
    pub status: ShipmentStatus,
    pub assigned_shipper: Option<Uuid>,
}

impl Order {
    pub fn new(
        customer_id: String,
        delivery_address: String,
        recipient_name: String,
        recipient_phone: String,
        items: Vec<OrderItem>,
        total_amount: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            customer_id,
            delivery_address,
            recipient_name,
            recipient_phone,
            items,
            total_amount,
            status: ShipmentStatus::AwaitingPickup,
            assigned_shipper: None,
        }
    }
}
