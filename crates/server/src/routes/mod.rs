//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! POST /customers                       - Upsert customer by phone_id
//! POST /api/agents/101/customers/add    - Legacy alias of POST /customers
//! POST /orders                          - Create order
//! POST /api/post-orders                 - Legacy alias of POST /orders
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Readiness (store ping)
//! ```

pub mod customers;
pub mod health;
pub mod orders;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{make_request_span, request_id_middleware};
use crate::state::AppState;

/// Build the application router with tracing and request-id layers.
///
/// Sentry layers are added by the binary, outside this router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/customers", post(customers::submit))
        .route("/api/agents/101/customers/add", post(customers::submit))
        .route("/orders", post(orders::submit))
        .route("/api/post-orders", post(orders::submit))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}
