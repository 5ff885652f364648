//! Order Intake Core - Shared types library.
//!
//! This crate provides the types shared by the intake components:
//! - `server` - HTTP endpoints accepting order and customer submissions
//! - `cli` - Command-line tools for migrations and connectivity checks
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. This keeps it lightweight and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, the `PhoneId` natural key, required-field
//!   validation, and reconciliation policies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
