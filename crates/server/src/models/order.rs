//! Order records and the order submission payload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use intake_core::{OrderId, RequiredFields, optional_text};

use super::SubmissionError;
use super::lenient;

/// Decimal places stored for `total` (`NUMERIC(12, 2)`).
pub const TOTAL_SCALE: u32 = 2;

/// Exclusive upper bound on `|total|` for `NUMERIC(12, 2)`: 10^10.
const TOTAL_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// A stored order. Orders are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub client_ai: Option<String>,
    pub name: String,
    pub phone: String,
    pub town: Option<String>,
    pub city: Option<String>,
    pub products: String,
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated order ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Free-form reference to the submitting client. Not validated.
    pub client_ai: Option<String>,
    pub name: String,
    pub phone: String,
    pub town: Option<String>,
    pub city: Option<String>,
    pub products: String,
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub observations: Option<String>,
}

/// Raw order form, as received over JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderSubmission {
    #[serde(default, deserialize_with = "lenient::text")]
    pub client_ai: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub town: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub products: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub observations: Option<String>,
}

impl OrderSubmission {
    /// Check `name`, `phone`, `products` and `total`.
    ///
    /// A `total` of zero counts as missing. A non-zero `total` must fit the
    /// stored precision exactly, so sub-cent amounts are rejected instead of
    /// being rounded on insert.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Missing` listing every missing field, or
    /// `SubmissionError::Invalid` for a `total` the store cannot hold.
    pub fn validate(self) -> Result<NewOrder, SubmissionError> {
        let mut check = RequiredFields::default();

        let (Some(name), Some(phone), Some(products), Some(total)) = (
            check.text("name", self.name),
            check.text("phone", self.phone),
            check.text("products", self.products),
            check.amount("total", self.total),
        ) else {
            return Err(check.into_missing().into());
        };
        let total = check_total(total)?;

        Ok(NewOrder {
            client_ai: optional_text(self.client_ai),
            name,
            phone,
            town: optional_text(self.town),
            city: optional_text(self.city),
            products,
            total,
            payment_method: optional_text(self.payment_method),
            observations: optional_text(self.observations),
        })
    }
}

fn check_total(total: Decimal) -> Result<Decimal, SubmissionError> {
    let total = total.normalize();
    if total.scale() > TOTAL_SCALE {
        return Err(SubmissionError::Invalid {
            field: "total",
            reason: format!("at most {TOTAL_SCALE} decimal places are allowed"),
        });
    }
    if total.abs() >= TOTAL_LIMIT {
        return Err(SubmissionError::Invalid {
            field: "total",
            reason: format!("must be less than {TOTAL_LIMIT}"),
        });
    }
    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submission() -> OrderSubmission {
        OrderSubmission {
            client_ai: Some("agent-101".into()),
            name: Some("Luis Pérez".into()),
            phone: Some("5512345678".into()),
            town: Some("  ".into()),
            city: Some("Puebla".into()),
            products: Some("2x tamales, 1x atole".into()),
            total: Some(Decimal::new(8550, 2)),
            payment_method: None,
            observations: Some("Sin picante".into()),
        }
    }

    #[test]
    fn test_valid_order() {
        let order = submission().validate().unwrap();
        assert_eq!(order.total, Decimal::new(8550, 2));
        assert_eq!(order.client_ai.as_deref(), Some("agent-101"));
        assert_eq!(order.city.as_deref(), Some("Puebla"));
        assert!(order.town.is_none());
        assert!(order.payment_method.is_none());
    }

    #[test]
    fn test_zero_total_is_missing() {
        let mut s = submission();
        s.total = Some(Decimal::ZERO);
        let err = s.validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: total");
    }

    #[test]
    fn test_all_required_missing() {
        let err = OrderSubmission::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: name, phone, products, total"
        );
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let s: OrderSubmission = serde_json::from_str(
            r#"{"name": "Ana", "phone": 5512345678, "products": "pan", "total": "42.50"}"#,
        )
        .unwrap();
        let order = s.validate().unwrap();
        assert_eq!(order.phone, "5512345678");
        assert_eq!(order.total, Decimal::new(4250, 2));
        assert!(order.client_ai.is_none());
    }

    #[test]
    fn test_sub_cent_total_rejected() {
        for raw in ["0.004", "19.999"] {
            let mut s = submission();
            s.total = Some(raw.parse().unwrap());
            let err = s.validate().unwrap_err();
            assert!(
                matches!(err, SubmissionError::Invalid { field: "total", .. }),
                "{raw}: {err}"
            );
        }
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_precision() {
        let mut s = submission();
        s.total = Some("85.500".parse().unwrap());
        assert_eq!(s.validate().unwrap().total, Decimal::new(855, 1));
    }

    #[test]
    fn test_total_beyond_stored_precision_rejected() {
        let mut s = submission();
        s.total = Some("10000000000".parse().unwrap());
        let err = s.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid field total: must be less than 10000000000");

        let mut s = submission();
        s.total = Some("9999999999.99".parse().unwrap());
        assert!(s.validate().is_ok());
    }
}
