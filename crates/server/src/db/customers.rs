//! Customer repository for database operations.
//!
//! Queries are checked at runtime (`query_as` + `bind`) so the crate builds
//! without a live database.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use intake_core::{CustomerId, PhoneId};

use super::{Lookup, StoreError, map_unique_violation};
use crate::models::{Customer, CustomerFields, Upserted};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for customer queries.
///
/// A stored `phone_id` that no longer parses fails to decode and surfaces as
/// `StoreError::DataCorruption`.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    phone_id: Option<PhoneId>,
    fullname: String,
    address: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            phone_id: row.phone_id,
            fullname: row.fullname,
            address: row.address,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for the conditional upsert.
#[derive(Debug, sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    inserted: bool,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a customer by natural key.
    ///
    /// Fetches at most two rows so that a duplicated key is detected rather
    /// than silently resolved to whichever row comes first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateKey` if the key matches more than one row.
    /// Returns `StoreError::Database` if the query fails.
    #[instrument(skip(self), fields(phone_id = %phone_id))]
    pub async fn find_by_phone_id(
        &self,
        phone_id: &PhoneId,
    ) -> Result<Lookup<Customer>, StoreError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r"
            SELECT id, phone_id, fullname, address, phone, created_at, updated_at
            FROM intake.customer
            WHERE phone_id = $1
            ORDER BY id
            LIMIT 2
            ",
        )
        .bind(phone_id)
        .fetch_all(self.pool)
        .await?;

        let mut rows = rows.into_iter();
        match (rows.next(), rows.next()) {
            (None, _) => Ok(Lookup::NotFound),
            (Some(row), None) => Ok(Lookup::Found(row.into())),
            (Some(_), Some(_)) => Err(StoreError::DuplicateKey(format!(
                "phone_id {phone_id} matches more than one customer"
            ))),
        }
    }

    /// Overwrite the value fields of the customer keyed by `phone_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no customer has the key.
    /// Returns `StoreError::Database` for other database errors.
    #[instrument(skip(self, fields), fields(phone_id = %phone_id))]
    pub async fn update_fields(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError> {
        let row: Option<CustomerRow> = sqlx::query_as(
            r"
            UPDATE intake.customer
            SET fullname = $2, address = $3, phone = $4, updated_at = NOW()
            WHERE phone_id = $1
            RETURNING id, phone_id, fullname, address, phone, created_at, updated_at
            ",
        )
        .bind(phone_id)
        .bind(&fields.fullname)
        .bind(&fields.address)
        .bind(&fields.phone)
        .fetch_optional(self.pool)
        .await?;

        let customer: Customer = row.ok_or(StoreError::NotFound)?.into();
        debug!(id = %customer.id, "Updated customer");
        Ok(customer)
    }

    /// Insert a new customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the `phone_id` already exists.
    /// Returns `StoreError::Database` for other database errors.
    #[instrument(skip(self, fields), fields(phone_id = ?phone_id.map(PhoneId::as_str)))]
    pub async fn insert(
        &self,
        phone_id: Option<&PhoneId>,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError> {
        let row: CustomerRow = sqlx::query_as(
            r"
            INSERT INTO intake.customer (phone_id, fullname, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, phone_id, fullname, address, phone, created_at, updated_at
            ",
        )
        .bind(phone_id)
        .bind(&fields.fullname)
        .bind(&fields.address)
        .bind(&fields.phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "phone_id"))?;

        let customer: Customer = row.into();
        debug!(id = %customer.id, "Inserted customer");
        Ok(customer)
    }

    /// Insert or overwrite the customer keyed by `phone_id` in one statement.
    ///
    /// `xmax = 0` holds only for a freshly inserted tuple, which tells the
    /// two outcomes apart without a second round trip.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    #[instrument(skip(self, fields), fields(phone_id = %phone_id))]
    pub async fn upsert(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Upserted, StoreError> {
        let row: UpsertRow = sqlx::query_as(
            r"
            INSERT INTO intake.customer (phone_id, fullname, address, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (phone_id) DO UPDATE
            SET fullname = EXCLUDED.fullname,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                updated_at = NOW()
            RETURNING id, phone_id, fullname, address, phone, created_at, updated_at,
                      (xmax = 0) AS inserted
            ",
        )
        .bind(phone_id)
        .bind(&fields.fullname)
        .bind(&fields.address)
        .bind(&fields.phone)
        .fetch_one(self.pool)
        .await?;

        let inserted = row.inserted;
        let customer: Customer = row.customer.into();
        debug!(id = %customer.id, inserted, "Upserted customer");
        Ok(Upserted { customer, inserted })
    }
}
