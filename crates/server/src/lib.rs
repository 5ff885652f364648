//! Order Intake server library.
//!
//! HTTP endpoints accepting order and customer submissions. Customers are
//! reconciled by their `phone_id` natural key; orders are append-only.
//!
//! The crate is a library so the router can be driven in tests against the
//! in-memory store; `main.rs` wires it to `PostgreSQL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
