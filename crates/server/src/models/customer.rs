//! Customer records and the customer submission payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use intake_core::{CustomerId, EmptyKeyPolicy, PhoneId, RequiredFields, optional_text};

use super::SubmissionError;
use super::lenient;

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Natural key. `None` for records inserted without one.
    pub phone_id: Option<PhoneId>,
    pub fullname: String,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The value fields a submission overwrites. All three are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub fullname: String,
    pub address: String,
    pub phone: String,
}

/// Result of a single conditional write keyed on `phone_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub customer: Customer,
    /// `true` when the row did not exist before the write.
    pub inserted: bool,
}

/// Raw customer form, as received over JSON or `x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerSubmission {
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fullname: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
}

/// A customer submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCustomer {
    pub phone_id: Option<PhoneId>,
    pub fields: CustomerFields,
}

impl CustomerSubmission {
    /// Check required fields and parse the natural key.
    ///
    /// A blank or absent `phone_id` is reported as missing under
    /// [`EmptyKeyPolicy::Reject`] and passed through as `None` under
    /// [`EmptyKeyPolicy::AlwaysInsert`].
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Missing` listing every missing field, or
    /// `SubmissionError::Invalid` if `phone_id` is present but malformed.
    pub fn validate(self, policy: EmptyKeyPolicy) -> Result<ValidCustomer, SubmissionError> {
        let mut check = RequiredFields::default();

        let (Some(fullname), Some(address), Some(phone)) = (
            check.text("fullname", self.fullname),
            check.text("address", self.address),
            check.text("phone", self.phone),
        ) else {
            if policy == EmptyKeyPolicy::Reject && optional_text(self.phone_id).is_none() {
                check.mark_missing("phone_id");
            }
            return Err(check.into_missing().into());
        };

        let phone_id = match optional_text(self.phone_id) {
            Some(raw) => Some(PhoneId::parse(&raw).map_err(|e| SubmissionError::Invalid {
                field: "phone_id",
                reason: e.to_string(),
            })?),
            None if policy == EmptyKeyPolicy::Reject => {
                check.mark_missing("phone_id");
                return Err(check.into_missing().into());
            }
            None => None,
        };

        Ok(ValidCustomer {
            phone_id,
            fields: CustomerFields {
                fullname,
                address,
                phone,
            },
        })
    }
}
