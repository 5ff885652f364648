//! `PostgreSQL` backend for the store traits.

use async_trait::async_trait;
use sqlx::PgPool;

use intake_core::PhoneId;

use super::{
    CustomerRepository, CustomerStore, Lookup, OrderRepository, OrderStore, Store, StoreError,
};
use crate::models::{Customer, CustomerFields, NewOrder, Order, Upserted};

/// Store backed by a `PostgreSQL` pool.
///
/// Cloning is cheap: `PgPool` is reference counted.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CustomerStore for PgStore {
    async fn find_by_phone_id(&self, phone_id: &PhoneId) -> Result<Lookup<Customer>, StoreError> {
        CustomerRepository::new(&self.pool)
            .find_by_phone_id(phone_id)
            .await
    }

    async fn update_fields(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError> {
        CustomerRepository::new(&self.pool)
            .update_fields(phone_id, fields)
            .await
    }

    async fn insert(
        &self,
        phone_id: Option<&PhoneId>,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError> {
        CustomerRepository::new(&self.pool)
            .insert(phone_id, fields)
            .await
    }

    async fn upsert(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Upserted, StoreError> {
        CustomerRepository::new(&self.pool)
            .upsert(phone_id, fields)
            .await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        OrderRepository::new(&self.pool).insert(order).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
