//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::BackendClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: BackendClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The backend base address is resolved here, once.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = BackendClient::new(&config.api);

        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the bakery backend client.
    #[must_use]
    pub fn api(&self) -> &BackendClient {
        &self.inner.api
    }
}
