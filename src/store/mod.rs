use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{Order, ShipmentStatus};

/// Shared order collection with a conditional-write primitive.
///
/// The map's entry lock serializes conflicting writers on the same record,
/// so `conditional_update` behaves as a compare-and-swap on the status
/// field: the first writer to pass its precondition wins, every other
/// writer observes a stale precondition and is rejected.
pub struct OrderStore {
    orders: DashMap<Uuid, Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }

    /// Seeds a record. Order placement itself is upstream of this service;
    /// this exists for that process and for tests.
    pub fn insert(&self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn get(&self, id: Uuid) -> Result<Order, AppError> {
        self.orders
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))
    }

    /// All orders currently in `status`. Unordered; display ordering is a
    /// caller concern.
    pub fn list_by_status(&self, status: ShipmentStatus) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|entry| entry.value().status == status)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Applies `patch` to the record only if its status still equals
    /// `expected`, holding the entry lock across the check and the write.
    /// Returns the updated record, or `Conflict` when the precondition has
    /// gone stale.
    pub fn conditional_update<F>(
        &self,
        id: Uuid,
        expected: ShipmentStatus,
        patch: F,
    ) -> Result<Order, AppError>
    where
        F: FnOnce(&mut Order),
    {
        let mut entry = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        if entry.status != expected {
            return Err(AppError::Conflict(format!(
                "order {id} is no longer {expected:?}"
            )));
        }

        patch(entry.value_mut());
        Ok(entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStore;
    use crate::error::AppError;
    use crate::models::order::{Order, ShipmentStatus};
    use uuid::Uuid;

    fn seeded() -> (OrderStore, Uuid) {
        let store = OrderStore::new();
        let order = Order::new(
            "customer-1".to_string(),
            "12 Nguyen Hue, District 1, Ho Chi Minh City".to_string(),
            "Linh Tran".to_string(),
            "+84 90 000 0000".to_string(),
            vec![],
            150_000,
        );
        let id = order.id;
        store.insert(order);
        (store, id)
    }

    #[test]
    fn conditional_update_applies_when_precondition_holds() {
        let (store, id) = seeded();

        let updated = store
            .conditional_update(id, ShipmentStatus::AwaitingPickup, |order| {
                order.status = ShipmentStatus::InTransit;
            })
            .unwrap();

        assert_eq!(updated.status, ShipmentStatus::InTransit);
        assert_eq!(store.get(id).unwrap().status, ShipmentStatus::InTransit);
    }

    #[test]
    fn conditional_update_rejects_stale_precondition() {
        let (store, id) = seeded();

        store
            .conditional_update(id, ShipmentStatus::AwaitingPickup, |order| {
                order.status = ShipmentStatus::InTransit;
            })
            .unwrap();

        let err = store
            .conditional_update(id, ShipmentStatus::AwaitingPickup, |order| {
                order.status = ShipmentStatus::Delivered;
            })
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.get(id).unwrap().status, ShipmentStatus::InTransit);
    }

    #[test]
    fn conditional_update_on_missing_order_is_not_found() {
        let store = OrderStore::new();
        let err = store
            .conditional_update(Uuid::new_v4(), ShipmentStatus::AwaitingPickup, |_| {})
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
