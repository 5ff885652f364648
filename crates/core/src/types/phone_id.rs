//! Customer natural key.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneIdError {
    /// The input is empty or only whitespace.
    #[error("phone_id cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("phone_id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The caller-supplied natural key of a customer record.
///
/// Submissions carrying the same `PhoneId` reconcile against the same stored
/// customer. The store compares keys by exact equality, so the only
/// normalization applied here is trimming surrounding whitespace.
///
/// ## Examples
///
/// ```
/// use intake_core::PhoneId;
///
/// let key = PhoneId::parse("  5215512345678 ").unwrap();
/// assert_eq!(key.as_str(), "5215512345678");
///
/// assert!(PhoneId::parse("").is_err());
/// assert!(PhoneId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneId(String);

impl PhoneId {
    /// Maximum length of a phone id.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `PhoneId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`PhoneId::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, PhoneIdError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PhoneIdError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(PhoneIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneId {
    type Err = PhoneIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PhoneId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PhoneId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Self::parse(s).map_err(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PhoneId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
