//! Product REST API client implementation.

use std::sync::Arc;

use duka_core::Product;
use tracing::instrument;
use url::Url;

use super::CatalogError;
use crate::config::CatalogApiConfig;

/// How much of an error body to keep for logs and error messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the product REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    products_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogApiConfig) -> Self {
        Self::with_base_url(&config.base_url)
    }

    /// Create a client for the API rooted at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: &Url) -> Self {
        let products_url = format!("{}/products", base_url.as_str().trim_end_matches('/'));

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                products_url,
            }),
        }
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure, non-2xx status, or a body
    /// that is not a JSON array.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.inner.client.get(&self.inner.products_url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %preview(&body),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                message: preview(&body),
            });
        }

        let products = Product::list_from_json(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&body),
                "Failed to parse catalog API response"
            );
            CatalogError::Parse(e)
        })?;
        tracing::debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}
