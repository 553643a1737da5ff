//! Product REST API client with full CRUD access.
//!
//! # Architecture
//!
//! - The backend is the source of truth; the admin never edits its local
//!   list in place, it re-fetches after every successful mutation
//! - One request per operation, no retries
//! - Any non-2xx status is a failure
//!
//! # Example
//!
//! ```rust,ignore
//! use duka_admin::catalog::{AdminCatalogClient, ProductApi};
//!
//! let client = AdminCatalogClient::new(&config.catalog_api_url);
//!
//! let products = client.list_products().await?;
//! client.delete_product(&ProductId::new("7")).await?;
//! ```

mod client;

pub use client::AdminCatalogClient;

use std::future::Future;

use duka_core::{Product, ProductId, ProductPatch};
use thiserror::Error;

/// Errors that can occur when talking to the product REST API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connection refused, timeout, bad body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog API returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The requested product does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Operations the admin needs from the product backend.
pub trait ProductApi {
    /// `GET /products`
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// `GET /products/{id}`
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// `POST /products`, body without `id`.
    fn create_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// `PATCH /products/{id}` with only the changed fields.
    fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// `DELETE /products/{id}`
    fn delete_product(&self, id: &ProductId)
    -> impl Future<Output = Result<(), CatalogError>> + Send;
}
