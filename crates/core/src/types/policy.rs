//! Reconciliation policies for customer submissions.

use serde::{Deserialize, Serialize};

/// What to do with a customer submission whose `phone_id` is empty or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyKeyPolicy {
    /// Reject the submission as a validation error naming `phone_id`.
    #[default]
    Reject,
    /// Insert a new record without a key. Such records never match later
    /// submissions.
    AlwaysInsert,
}

impl std::fmt::Display for EmptyKeyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::AlwaysInsert => write!(f, "insert"),
        }
    }
}

impl std::str::FromStr for EmptyKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "insert" | "always_insert" => Ok(Self::AlwaysInsert),
            _ => Err(format!("invalid empty key policy: {s}")),
        }
    }
}

/// How a keyed customer submission is reconciled against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileMode {
    /// One conditional write (`INSERT ... ON CONFLICT DO UPDATE`) backed by
    /// the unique constraint on `phone_id`.
    #[default]
    Atomic,
    /// Lookup followed by a separate update or insert. Two first-time
    /// submissions for one key can both miss the lookup; the loser's insert
    /// then fails with a conflict.
    ReadThenWrite,
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atomic => write!(f, "atomic"),
            Self::ReadThenWrite => write!(f, "read-then-write"),
        }
    }
}

impl std::str::FromStr for ReconcileMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atomic" => Ok(Self::Atomic),
            "read-then-write" | "read_then_write" => Ok(Self::ReadThenWrite),
            _ => Err(format!("invalid reconcile mode: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(EmptyKeyPolicy::default(), EmptyKeyPolicy::Reject);
        assert_eq!(ReconcileMode::default(), ReconcileMode::Atomic);
    }

    #[test]
    fn test_display_parses_back() {
        for policy in [EmptyKeyPolicy::Reject, EmptyKeyPolicy::AlwaysInsert] {
            assert_eq!(policy.to_string().parse::<EmptyKeyPolicy>().unwrap(), policy);
        }
        for mode in [ReconcileMode::Atomic, ReconcileMode::ReadThenWrite] {
            assert_eq!(mode.to_string().parse::<ReconcileMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!("maybe".parse::<EmptyKeyPolicy>().is_err());
        assert!("eventually".parse::<ReconcileMode>().is_err());
    }
}
