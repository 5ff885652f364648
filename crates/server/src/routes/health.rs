//! Health check endpoints.

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn liveness() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Pings the store. Returns 503 Service Unavailable if it is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::db::{MemoryStore, Operation};
    use crate::response::ResponseFormat;
    use crate::routes::router;
    use crate::services::Reconciler;

    use super::*;

    async fn get_status(store: Arc<MemoryStore>, uri: &str) -> StatusCode {
        let app = router(AppState::with_parts(
            store,
            Reconciler::default(),
            ResponseFormat::Json,
        ));
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_liveness() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(get_status(store, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(get_status(store.clone(), "/health/ready").await, StatusCode::OK);

        store.fail(Operation::Ping);
        assert_eq!(
            get_status(store, "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
