//! Order creation. Orders carry no natural key, so every submission inserts.

use tracing::{info, instrument};

use intake_core::OrderId;

use crate::db::{OrderStore, StoreError};
use crate::models::NewOrder;

/// Insert a validated order and return its new id.
///
/// # Errors
///
/// Returns `StoreError` if the insert fails. Nothing is retried.
#[instrument(skip(store, order), fields(phone = %order.phone))]
pub async fn create_order<S>(store: &S, order: &NewOrder) -> Result<OrderId, StoreError>
where
    S: OrderStore + ?Sized,
{
    let stored = store.insert_order(order).await?;
    info!(id = %stored.id, total = %stored.total, "Order created");
    Ok(stored.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::{MemoryStore, Operation};

    fn order() -> NewOrder {
        NewOrder {
            client_ai: None,
            name: "Luis".into(),
            phone: "5512345678".into(),
            town: None,
            city: Some("Puebla".into()),
            products: "pan dulce".into(),
            total: Decimal::new(4250, 2),
            payment_method: Some("efectivo".into()),
            observations: None,
        }
    }

    #[tokio::test]
    async fn test_identical_orders_are_independent() {
        let store = MemoryStore::new();
        let a = create_order(&store, &order()).await.unwrap();
        let b = create_order(&store, &order()).await.unwrap();
        assert_ne!(a, b);

        let stored = store.orders().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].total, Decimal::new(4250, 2));
        assert_eq!(stored[1].city.as_deref(), Some("Puebla"));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = MemoryStore::new();
        store.fail(Operation::InsertOrder);
        let err = create_order(&store, &order()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.orders().await.is_empty());
    }
}
