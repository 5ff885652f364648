//! Domain models and submission payloads.

pub mod customer;
mod lenient;
pub mod order;

use intake_core::MissingFields;
use thiserror::Error;

pub use customer::{Customer, CustomerFields, CustomerSubmission, Upserted, ValidCustomer};
pub use order::{NewOrder, Order, OrderSubmission};

/// Why a submission was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// One or more required fields were absent or blank.
    #[error(transparent)]
    Missing(#[from] MissingFields),

    /// A field was present but malformed.
    #[error("Invalid field {field}: {reason}")]
    Invalid {
        /// Field name as it appears in the payload.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}
