//! Product management commands.

use duka_admin::catalog::ProductApi;
use duka_core::{Price, Product, ProductId};
use tracing::info;

use super::{CommandError, client};

/// Fields for a product to create.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub image_url: String,
    pub description: String,
    pub price: Price,
}

impl From<NewProduct> for Product {
    fn from(new: NewProduct) -> Self {
        Self {
            id: None,
            name: new.name,
            category: new.category,
            brand: new.brand,
            image_url: new.image_url,
            description: new.description,
            price: new.price,
        }
    }
}

/// List all products.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or answers non-2xx.
pub async fn list() -> Result<(), CommandError> {
    let products = client()?.list_products().await?;

    info!("{} product(s)", products.len());
    for product in &products {
        info!(
            "  {:<12} {:<32} {:<16} {}",
            product
                .id
                .as_ref()
                .map_or("-", ProductId::as_str),
            product.name,
            product.category,
            product.price
        );
    }
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns `CatalogError::NotFound` if the id is unknown.
pub async fn show(id: &ProductId) -> Result<(), CommandError> {
    let product = client()?.get_product(id).await?;

    info!("Product {id}");
    info!("  Name:        {}", product.name);
    info!("  Category:    {}", product.category);
    info!("  Brand:       {}", product.brand);
    info!("  Price:       {}", product.price);
    info!("  Image:       {}", product.image_url);
    info!("  Description: {}", product.description);
    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns an error if the backend rejects the product.
pub async fn add(new: NewProduct) -> Result<(), CommandError> {
    let product = Product::from(new);
    client()?.create_product(&product).await?;
    info!("Created product: {}", product.name);
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the backend answers non-2xx.
pub async fn delete(id: &ProductId) -> Result<(), CommandError> {
    client()?.delete_product(id).await?;
    info!("Deleted product {id}");
    Ok(())
}
