//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::AdminCatalogClient;
use crate::config::AdminConfig;

/// Application state shared across all admin handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    catalog: AdminCatalogClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let catalog = AdminCatalogClient::new(&config.catalog_api_url);

        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the product REST API client.
    #[must_use]
    pub fn catalog(&self) -> &AdminCatalogClient {
        &self.inner.catalog
    }
}
