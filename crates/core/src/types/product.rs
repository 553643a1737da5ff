//! Catalog product records as exchanged with the backend REST API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;

/// Errors raised when a product is used in a way its state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// The product has not been created on the backend yet.
    #[error("product has no id (not saved yet)")]
    Unsaved,
}

/// A catalog item.
///
/// `id` is assigned by the backend and is absent on products that have not
/// been created yet. No other field is validated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
}

impl Product {
    /// Whether the backend has assigned this product an id.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// The product id, required by every mutation.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Unsaved` if the product has no id.
    pub fn require_id(&self) -> Result<&ProductId, ProductError> {
        self.id.as_ref().ok_or(ProductError::Unsaved)
    }

    /// Decode a `GET /products` body.
    ///
    /// The body must be a JSON array. Rows that do not decode as a product
    /// are logged and skipped so one bad record does not hide the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON array.
    pub fn list_from_json(body: &str) -> serde_json::Result<Vec<Self>> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(body)?;
        Ok(rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping undecodable product");
                    None
                }
            })
            .collect())
    }

    /// Copy of this product without its id, suitable as a create body.
    #[must_use]
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

/// Partial product used for `PATCH` requests. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl ProductPatch {
    /// A patch that overwrites every editable field with `product`'s values.
    #[must_use]
    pub fn replace_all(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            category: Some(product.category.clone()),
            brand: Some(product.brand.clone()),
            image_url: Some(product.image_url.clone()),
            description: Some(product.description.clone()),
            price: Some(product.price),
        }
    }

    /// Apply the patch to a product in place.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(category) = &self.category {
            product.category.clone_from(category);
        }
        if let Some(brand) = &self.brand {
            product.brand.clone_from(brand);
        }
        if let Some(image_url) = &self.image_url {
            product.image_url.clone_from(image_url);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}
