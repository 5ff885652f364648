//! Upsert-by-natural-key reconciliation for customer submissions.
//!
//! Given a validated [`CustomerFields`] and an optional [`PhoneId`], the
//! [`Reconciler`] decides whether the submission updates an existing customer
//! or creates a new one.
//!
//! # Modes
//!
//! - [`ReconcileMode::Atomic`] issues one conditional write. The unique
//!   constraint on `phone_id` serializes concurrent first submissions, so the
//!   key never ends up duplicated.
//! - [`ReconcileMode::ReadThenWrite`] looks the key up, then updates or
//!   inserts. A lookup error aborts before any write. Two first submissions
//!   racing on one key both miss the lookup; the second insert fails with
//!   [`StoreError::Conflict`].

use thiserror::Error;
use tracing::{debug, instrument};

use intake_core::{CustomerId, EmptyKeyPolicy, PhoneId, ReconcileMode};

use crate::db::{CustomerStore, Lookup, StoreError};
use crate::models::CustomerFields;

/// Errors that can occur during reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// No natural key, and the policy rejects keyless submissions.
    #[error("phone_id is required")]
    MissingKey,

    /// The store failed during lookup or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub id: CustomerId,
    /// `true` when an existing customer was overwritten.
    pub was_updated: bool,
}

impl Reconciled {
    const fn created(id: CustomerId) -> Self {
        Self {
            id,
            was_updated: false,
        }
    }

    const fn updated(id: CustomerId) -> Self {
        Self {
            id,
            was_updated: true,
        }
    }
}

/// Decides between update and insert for customer submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciler {
    mode: ReconcileMode,
    empty_key: EmptyKeyPolicy,
}

impl Reconciler {
    #[must_use]
    pub const fn new(mode: ReconcileMode, empty_key: EmptyKeyPolicy) -> Self {
        Self { mode, empty_key }
    }

    #[must_use]
    pub const fn mode(&self) -> ReconcileMode {
        self.mode
    }

    #[must_use]
    pub const fn empty_key(&self) -> EmptyKeyPolicy {
        self.empty_key
    }

    /// Apply `fields` to the customer keyed by `phone_id`, creating it if
    /// absent.
    ///
    /// Without a key, [`EmptyKeyPolicy::AlwaysInsert`] inserts a keyless
    /// customer and [`EmptyKeyPolicy::Reject`] fails.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::MissingKey` for a keyless submission under
    /// the reject policy, and `ReconcileError::Store` for any store failure,
    /// including `StoreError::DuplicateKey` when the key already matches
    /// several customers and `StoreError::Conflict` when a read-then-write
    /// insert loses a race.
    #[instrument(
        skip(self, store, fields),
        fields(mode = %self.mode, phone_id = ?phone_id.map(PhoneId::as_str))
    )]
    pub async fn reconcile<S>(
        &self,
        store: &S,
        phone_id: Option<&PhoneId>,
        fields: &CustomerFields,
    ) -> Result<Reconciled, ReconcileError>
    where
        S: CustomerStore + ?Sized,
    {
        let Some(key) = phone_id else {
            return match self.empty_key {
                EmptyKeyPolicy::Reject => Err(ReconcileError::MissingKey),
                EmptyKeyPolicy::AlwaysInsert => {
                    let customer = store.insert(None, fields).await?;
                    debug!(id = %customer.id, "Inserted keyless customer");
                    Ok(Reconciled::created(customer.id))
                }
            };
        };

        let outcome = match self.mode {
            ReconcileMode::Atomic => {
                let upserted = store.upsert(key, fields).await?;
                if upserted.inserted {
                    Reconciled::created(upserted.customer.id)
                } else {
                    Reconciled::updated(upserted.customer.id)
                }
            }
            ReconcileMode::ReadThenWrite => Self::read_then_write(store, key, fields).await?,
        };

        debug!(id = %outcome.id, was_updated = outcome.was_updated, "Reconciled customer");
        Ok(outcome)
    }

    async fn read_then_write<S>(
        store: &S,
        key: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Reconciled, StoreError>
    where
        S: CustomerStore + ?Sized,
    {
        match store.find_by_phone_id(key).await? {
            Lookup::Found(_) => {
                let customer = store.update_fields(key, fields).await?;
                Ok(Reconciled::updated(customer.id))
            }
            Lookup::NotFound => {
                let customer = store.insert(Some(key), fields).await?;
                Ok(Reconciled::created(customer.id))
            }
        }
    }
}
