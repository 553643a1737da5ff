//! CLI subcommands.

pub mod products;
pub mod seed;

use duka_admin::catalog::{AdminCatalogClient, CatalogError};
use duka_admin::config::{ConfigError, catalog_api_url_from_env};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The product REST API call failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The seed file is not a valid product list.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Build a catalog client from `CATALOG_API_URL`.
fn client() -> Result<AdminCatalogClient, CommandError> {
    dotenvy::dotenv().ok();
    let url = catalog_api_url_from_env()?;
    tracing::debug!(catalog_api = %url, "Using product API");
    Ok(AdminCatalogClient::new(&url))
}
