//! Admin REST client for the product backend.

use std::sync::Arc;

use duka_core::{Product, ProductId, ProductPatch};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{CatalogError, ProductApi};

/// How much of an error body to keep for logs and error messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Read-write client for the product REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct AdminCatalogClient {
    inner: Arc<AdminCatalogClientInner>,
}

struct AdminCatalogClientInner {
    client: reqwest::Client,
    products_url: String,
}

impl AdminCatalogClient {
    /// Create a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let products_url = format!("{}/products", base_url.as_str().trim_end_matches('/'));

        Self {
            inner: Arc::new(AdminCatalogClientInner {
                client: reqwest::Client::new(),
                products_url,
            }),
        }
    }

    fn product_url(&self, id: &ProductId) -> String {
        format!("{}/{}", self.inner.products_url, id.path_segment())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner.client.request(method, url)
    }

    /// Send a request and fail on any non-2xx status.
    async fn send(&self, request: RequestBuilder) -> Result<Response, CatalogError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = %status,
            body = %preview(&body),
            "Catalog API returned non-success status"
        );
        Err(CatalogError::Status {
            status,
            message: preview(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, CatalogError> {
        let body = self.send(request).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| parse_failure(e, &body))
    }
}

impl ProductApi for AdminCatalogClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let body = self
            .send(self.request(Method::GET, &self.inner.products_url))
            .await?
            .text()
            .await?;
        let products = Product::list_from_json(&body).map_err(|e| parse_failure(e, &body))?;
        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let request = self.request(Method::GET, &self.product_url(id));
        match self.send_json(request).await {
            Err(CatalogError::Status { status, .. }) if status == reqwest::StatusCode::NOT_FOUND => {
                Err(CatalogError::NotFound(format!("product {id}")))
            }
            other => other,
        }
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(&self, product: &Product) -> Result<(), CatalogError> {
        let body = product.without_id();
        self.send(
            self.request(Method::POST, &self.inner.products_url)
                .json(&body),
        )
        .await?;
        tracing::info!("Product created");
        Ok(())
    }

    #[instrument(skip(self, patch), fields(product_id = %id))]
    async fn update_product(&self, id: &ProductId, patch: &ProductPatch) -> Result<(), CatalogError> {
        self.send(self.request(Method::PATCH, &self.product_url(id)).json(patch))
            .await?;
        tracing::info!("Product updated");
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.send(self.request(Method::DELETE, &self.product_url(id)))
            .await?;
        tracing::info!("Product deleted");
        Ok(())
    }
}

fn parse_failure(error: serde_json::Error, body: &str) -> CatalogError {
    tracing::error!(
        error = %error,
        body = %preview(body),
        "Failed to parse catalog API response"
    );
    CatalogError::Parse(error)
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}
