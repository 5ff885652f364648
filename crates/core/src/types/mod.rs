//! Core types for order intake.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod fields;
pub mod id;
pub mod phone_id;
pub mod policy;

pub use fields::{MissingFields, RequiredFields, optional_text};
pub use id::*;
pub use phone_id::{PhoneId, PhoneIdError};
pub use policy::{EmptyKeyPolicy, ReconcileMode};
