//! Persistence for customers and orders.
//!
//! # Database: `PostgreSQL`, schema `intake`
//!
//! ## Tables
//!
//! - `customer` - Customers reconciled by the `phone_id` natural key
//!   (`UNIQUE (phone_id)`, NULL keys allowed and never colliding)
//! - `customer_order` - Append-only order submissions
//!
//! # Store Seam
//!
//! Handlers and services talk to the [`Store`] traits, never to `PgPool`
//! directly. [`PgStore`] is the production backend; [`MemoryStore`] backs
//! tests and supports failure injection.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p intake-cli -- migrate
//! ```

pub mod customers;
pub mod memory;
pub mod orders;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use intake_core::PhoneId;

use crate::models::{Customer, CustomerFields, NewOrder, Order, Upserted};

pub use customers::CustomerRepository;
pub use memory::{MemoryStore, Operation};
pub use orders::OrderRepository;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// More than one row matched a key expected to be unique.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique `phone_id`).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::DataCorruption(format!("column {index}: {source}"))
            }
            other => Self::Database(other),
        }
    }
}

/// Outcome of a lookup by natural key.
///
/// Zero matches is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    /// Convert into an `Option`.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

/// Customer persistence.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Find the customer whose `phone_id` equals `phone_id` exactly.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateKey` if more than one row matches, or
    /// any other `StoreError` for backend failures. No match is
    /// `Ok(Lookup::NotFound)`.
    async fn find_by_phone_id(&self, phone_id: &PhoneId) -> Result<Lookup<Customer>, StoreError>;

    /// Overwrite `fullname`, `address` and `phone` of the customer keyed by
    /// `phone_id`. The key itself is never changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has that key.
    async fn update_fields(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError>;

    /// Insert a new customer, with or without a key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if `phone_id` is already taken.
    async fn insert(
        &self,
        phone_id: Option<&PhoneId>,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError>;

    /// Insert or overwrite the customer keyed by `phone_id` in one atomic
    /// write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for backend failures.
    async fn upsert(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Upserted, StoreError>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for backend failures.
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError>;
}

/// A complete backend: both tables plus a connectivity check.
#[async_trait]
pub trait Store: CustomerStore + OrderStore {
    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if it is not.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(max_connections.min(2))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` if it is a unique violation.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!("{what} already exists"));
    }
    e.into()
}
