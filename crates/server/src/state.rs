//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::IntakeConfig;
use crate::db::Store;
use crate::response::ResponseFormat;
use crate::services::Reconciler;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store is constructed once
/// at startup and handed to every request through this state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
    reconciler: Reconciler,
    format: ResponseFormat,
}

impl AppState {
    /// Create a new application state from loaded configuration.
    #[must_use]
    pub fn new(config: &IntakeConfig, store: Arc<dyn Store>) -> Self {
        Self::with_parts(
            store,
            Reconciler::new(config.reconcile_mode, config.empty_key_policy),
            config.response_format,
        )
    }

    /// Create a state from explicit parts, bypassing configuration.
    #[must_use]
    pub fn with_parts(store: Arc<dyn Store>, reconciler: Reconciler, format: ResponseFormat) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                reconciler,
                format,
            }),
        }
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get the customer reconciler.
    #[must_use]
    pub fn reconciler(&self) -> Reconciler {
        self.inner.reconciler
    }

    /// Get the response format.
    #[must_use]
    pub fn format(&self) -> ResponseFormat {
        self.inner.format
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("reconciler", &self.inner.reconciler)
            .field("format", &self.inner.format)
            .finish_non_exhaustive()
    }
}
