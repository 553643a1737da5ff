//! Read-only client for the product REST API.
//!
//! # Architecture
//!
//! - The backend is the source of truth; nothing is cached locally
//! - Every page load fetches the full product list (no pagination)
//! - Any non-2xx status is a failure; there are no retries
//!
//! # Example
//!
//! ```rust,ignore
//! use duka_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let products = client.list_products().await?;
//! ```

mod client;

pub use client::CatalogClient;

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
}
