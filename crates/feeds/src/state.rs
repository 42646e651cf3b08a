//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::FeedsConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds only the request-independent settings;
/// Shopify credentials are resolved per request because they depend on the
/// `store` query parameter.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FeedsConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: FeedsConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config }),
        }
    }

    /// Get a reference to the feeds configuration.
    #[must_use]
    pub fn config(&self) -> &FeedsConfig {
        &self.inner.config
    }
}
