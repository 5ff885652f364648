//! Business logic services.
//!
//! # Services
//!
//! - `reconciler` - Upsert-by-natural-key for customer submissions
//! - `orders` - Unconditional order creation
//!
//! Services take the store as a generic `&S` so handlers can pass the
//! `dyn Store` held in `AppState` and tests can pass a `MemoryStore`.

pub mod orders;
pub mod reconciler;

pub use orders::create_order;
pub use reconciler::{ReconcileError, Reconciled, Reconciler};
