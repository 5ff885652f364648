//! Field deserializers that accept what form clients actually send.
//!
//! Text fields take strings or numbers (phone numbers often arrive as JSON
//! numbers); `null` is the same as absent. Amounts take numbers or numeric
//! strings, and a blank string is absent.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserializer;
use serde::de::{self, Visitor};

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

pub fn amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor)
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Option<Decimal>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Decimal::from_str(trimmed)
            .map(Some)
            .map_err(|e| E::custom(format!("invalid amount {trimmed:?}: {e}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // Shortest round-trip formatting keeps 19.99 as 19.99.
        self.visit_str(&v.to_string())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "text")]
        label: Option<String>,
        #[serde(default, deserialize_with = "amount")]
        total: Option<Decimal>,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_accepts_numbers() {
        assert_eq!(sample(r#"{"label": 5512345678}"#).label.as_deref(), Some("5512345678"));
        assert_eq!(sample(r#"{"label": "x"}"#).label.as_deref(), Some("x"));
    }

    #[test]
    fn test_null_and_absent_are_none() {
        let p = sample(r#"{"label": null, "total": null}"#);
        assert!(p.label.is_none());
        assert!(p.total.is_none());
        let p = sample("{}");
        assert!(p.label.is_none());
        assert!(p.total.is_none());
    }

    #[test]
    fn test_amount_forms() {
        assert_eq!(sample(r#"{"total": 250}"#).total, Some(Decimal::new(250, 0)));
        assert_eq!(sample(r#"{"total": 19.99}"#).total, Some(Decimal::new(1999, 2)));
        assert_eq!(sample(r#"{"total": "19.99"}"#).total, Some(Decimal::new(1999, 2)));
        assert_eq!(sample(r#"{"total": "  "}"#).total, None);
        assert_eq!(sample(r#"{"total": 0}"#).total, Some(Decimal::ZERO));
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert!(serde_json::from_str::<Sample>(r#"{"total": "a lot"}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"total": true}"#).is_err());
    }
}
