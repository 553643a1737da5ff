//! Seed the catalog from a YAML file.
//!
//! The file is a list of products in the REST API's field names:
//!
//! ```yaml
//! - name: Sufuria
//!   category: Kitchen
//!   brand: Jikoni
//!   imageUrl: https://img.example.com/sufuria.jpg
//!   description: Aluminium cooking pot
//!   price: 1200
//! ```
//!
//! Any `id` in the file is ignored; the backend assigns ids.

use std::path::Path;

use duka_admin::catalog::ProductApi;
use duka_core::Product;
use tracing::{error, info};

use super::{CommandError, client};

/// Parse a seed file's contents.
fn parse(content: &str) -> Result<Vec<Product>, CommandError> {
    let products: Vec<Product> = serde_yaml::from_str(content)?;
    Ok(products.iter().map(Product::without_id).collect())
}

/// Create every product in `file_path`.
///
/// Products are created one at a time; a failure is logged and seeding
/// carries on with the next product.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any product
/// failed to create.
pub async fn products(file_path: &str) -> Result<(), CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading products from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_string(),
            source,
        })?;
    let products = parse(&content)?;
    info!(count = products.len(), "Parsed seed file");

    let client = client()?;
    let mut created = 0usize;
    let mut last_error = None;
    for product in &products {
        match client.create_product(product).await {
            Ok(()) => created += 1,
            Err(e) => {
                error!(name = %product.name, "Failed to create product: {e}");
                last_error = Some(e);
            }
        }
    }

    info!("Seeding complete!");
    info!("  Products created: {created}");
    info!("  Failures: {}", products.len() - created);

    match last_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
