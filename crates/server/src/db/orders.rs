//! Order repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use intake_core::OrderId;

use super::StoreError;
use crate::models::{NewOrder, Order};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    client_ai: Option<String>,
    name: String,
    phone: String,
    town: Option<String>,
    city: Option<String>,
    products: String,
    total: Decimal,
    payment_method: Option<String>,
    observations: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            client_ai: row.client_ai,
            name: row.name,
            phone: row.phone,
            town: row.town,
            city: row.city,
            products: row.products,
            total: row.total,
            payment_method: row.payment_method,
            observations: row.observations,
            created_at: row.created_at,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    #[instrument(skip(self, order), fields(phone = %order.phone, total = %order.total))]
    pub async fn insert(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO intake.customer_order (
                client_ai, name, phone, town, city,
                products, total, payment_method, observations
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, client_ai, name, phone, town, city,
                      products, total, payment_method, observations, created_at
            ",
        )
        .bind(&order.client_ai)
        .bind(&order.name)
        .bind(&order.phone)
        .bind(&order.town)
        .bind(&order.city)
        .bind(&order.products)
        .bind(order.total)
        .bind(&order.payment_method)
        .bind(&order.observations)
        .fetch_one(self.pool)
        .await?;

        let order: Order = row.into();
        debug!(id = %order.id, "Inserted order");
        Ok(order)
    }
}
