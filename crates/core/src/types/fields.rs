//! Required-field validation for form submissions.
//!
//! Submissions arrive with every field optional. A [`RequiredFields`] check
//! walks the fields an endpoint requires, hands back the present values, and
//! remembers the names of the missing ones so the client gets one message
//! listing all of them.
//!
//! A field counts as missing when it is absent, `null`, blank after trimming,
//! or, for amounts, zero.

use rust_decimal::Decimal;

/// The required fields a submission did not supply, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields: {}", .fields.join(", "))]
pub struct MissingFields {
    fields: Vec<&'static str>,
}

impl MissingFields {
    /// Names of the missing fields.
    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}

/// Collects missing required fields while extracting their values.
///
/// ```
/// use intake_core::RequiredFields;
///
/// let mut check = RequiredFields::default();
/// let name = check.text("name", Some("Ana".to_string()));
/// let phone = check.text("phone", Some("  ".to_string()));
///
/// assert_eq!(name.as_deref(), Some("Ana"));
/// assert!(phone.is_none());
/// assert_eq!(
///     check.into_missing().to_string(),
///     "Missing required fields: phone"
/// );
/// ```
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    /// Require a text field. Returns the trimmed value when present.
    pub fn text(&mut self, name: &'static str, value: Option<String>) -> Option<String> {
        match value.map(|v| v.trim().to_owned()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.missing.push(name);
                None
            }
        }
    }

    /// Require a non-zero amount.
    ///
    /// Zero is treated as absent, matching how the form clients report an
    /// empty total.
    pub fn amount(&mut self, name: &'static str, value: Option<Decimal>) -> Option<Decimal> {
        match value {
            Some(v) if !v.is_zero() => Some(v),
            _ => {
                self.missing.push(name);
                None
            }
        }
    }

    /// Record a field as missing without inspecting a value.
    pub fn mark_missing(&mut self, name: &'static str) {
        self.missing.push(name);
    }

    /// Convert into the error listing the missing fields.
    #[must_use]
    pub fn into_missing(self) -> MissingFields {
        MissingFields {
            fields: self.missing,
        }
    }
}

/// Optional text field: blank strings are normalized to `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_present() {
        let mut check = RequiredFields::default();
        assert_eq!(
            check.text("fullname", Some("Ana Ruiz".into())).as_deref(),
            Some("Ana Ruiz")
        );
        assert_eq!(
            check.amount("total", Some(Decimal::new(1999, 2))),
            Some(Decimal::new(1999, 2))
        );
        assert!(check.into_missing().fields().is_empty());
    }

    #[test]
    fn test_missing_fields_listed_in_order() {
        let mut check = RequiredFields::default();
        check.text("fullname", None);
        check.text("address", Some(String::new()));
        check.text("phone", Some("5512345678".into()));
        let err = check.into_missing();
        assert_eq!(err.fields(), &["fullname", "address"]);
        assert_eq!(err.to_string(), "Missing required fields: fullname, address");
    }

    #[test]
    fn test_zero_amount_is_missing() {
        let mut check = RequiredFields::default();
        assert_eq!(check.amount("total", Some(Decimal::ZERO)), None);
        assert_eq!(check.amount("total", Some(Decimal::new(0, 2))), None);
        let err = check.into_missing();
        assert_eq!(err.fields(), &["total", "total"]);
    }

    #[test]
    fn test_negative_amount_is_present() {
        let mut check = RequiredFields::default();
        assert!(check.amount("total", Some(Decimal::new(-5, 0))).is_some());
        assert!(check.into_missing().fields().is_empty());
    }

    #[test]
    fn test_value_is_trimmed() {
        let mut check = RequiredFields::default();
        assert_eq!(
            check.text("name", Some("  Luis \n".into())).as_deref(),
            Some("Luis")
        );
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some("   ".into())), None);
        assert_eq!(optional_text(Some(" Puebla ".into())).as_deref(), Some("Puebla"));
    }
}
