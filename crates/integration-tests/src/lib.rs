//! Integration tests for the order intake service.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (in-memory store, no external services)
//! cargo test -p intake-integration-tests
//!
//! # Tests against a running server and PostgreSQL
//! cargo run -p intake-cli -- migrate
//! cargo run -p intake-server &
//! cargo test -p intake-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `in_process` - Real HTTP against the router served on an ephemeral port
//! - `http_endpoints` - Real HTTP against `INTAKE_BASE_URL`
//! - `postgres_store` - Store and reconciler against `INTAKE_DATABASE_URL`

use std::net::SocketAddr;
use std::sync::Arc;

use intake_server::db::Store;
use intake_server::response::ResponseFormat;
use intake_server::routes;
use intake_server::services::Reconciler;
use intake_server::state::AppState;
use tokio::net::TcpListener;
use uuid::Uuid;

/// Base URL of an externally started server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("INTAKE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A `phone_id` no other test run has used.
#[must_use]
pub fn unique_phone_id() -> String {
    format!("it-{}", Uuid::new_v4().simple())
}

/// A server running in this process on an ephemeral port.
pub struct TestApp {
    pub addr: SocketAddr,
}

impl TestApp {
    /// Serve the router over `store` until the test runtime shuts down.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(store: Arc<dyn Store>, reconciler: Reconciler, format: ResponseFormat) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let app = routes::router(AppState::with_parts(store, reconciler, format));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}
