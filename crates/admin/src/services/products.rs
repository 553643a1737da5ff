//! Product table management.
//!
//! A [`ProductsManager`] is built once per admin request. It holds the
//! last-fetched product list and the editing target, and every mutation goes
//! through the backend followed by a full re-fetch. Nothing is patched into
//! the local list, so a failed call leaves the previous list in place.

use duka_core::{Product, ProductId, ProductPatch};
use tracing::instrument;

use crate::catalog::{CatalogError, ProductApi};

/// Request-scoped view of the product table.
pub struct ProductsManager<'a, A> {
    api: &'a A,
    products: Vec<Product>,
    editing: Option<ProductId>,
}

impl<'a, A: ProductApi + Sync> ProductsManager<'a, A> {
    /// Create a manager with an empty list and no editing target.
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            products: Vec::new(),
            editing: None,
        }
    }

    /// Restore an editing target carried over from a previous request.
    #[must_use]
    pub fn with_editing(mut self, editing: Option<ProductId>) -> Self {
        self.editing = editing;
        self
    }

    /// The last-fetched product list.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Id of the record open in the edit form, if any.
    #[must_use]
    pub const fn editing(&self) -> Option<&ProductId> {
        self.editing.as_ref()
    }

    /// The record open in the edit form, looked up in the current list.
    #[must_use]
    pub fn editing_product(&self) -> Option<&Product> {
        let id = self.editing.as_ref()?;
        self.products.iter().find(|p| p.id.as_ref() == Some(id))
    }

    /// Replace the list with a fresh copy from the backend.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the fetch fails; the previous list is kept.
    #[instrument(skip(self))]
    pub async fn load_products(&mut self) -> Result<(), CatalogError> {
        self.products = self.api.list_products().await?;
        Ok(())
    }

    /// Create a product, then reload.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the create or the reload fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_product(&mut self, draft: &Product) -> Result<(), CatalogError> {
        self.api.create_product(draft).await?;
        self.load_products().await
    }

    /// Apply `patch` to product `id`, then reload.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the update or the reload fails.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(
        &mut self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<(), CatalogError> {
        self.api.update_product(id, patch).await?;
        self.load_products().await
    }

    /// Delete product `id`, then reload.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the delete or the reload fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&mut self, id: &ProductId) -> Result<(), CatalogError> {
        self.api.delete_product(id).await?;
        self.load_products().await
    }

    /// Mark `id` as the record being edited.
    pub fn open_edit(&mut self, id: ProductId) {
        tracing::debug!(product_id = %id, "Opening edit form");
        self.editing = Some(id);
    }

    /// Drop the editing target without saving.
    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    /// Save the form: update the editing target if there is one, create otherwise.
    ///
    /// The editing target is cleared only once the save and reload succeed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` from the underlying create or update.
    pub async fn submit(&mut self, form: &Product) -> Result<(), CatalogError> {
        match self.editing.clone() {
            Some(id) => {
                self.update_product(&id, &ProductPatch::replace_all(form))
                    .await?;
            }
            None => self.add_product(form).await?,
        }
        self.close_edit();
        Ok(())
    }

    /// Confirm product `id` exists and return where its detail view lives.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the product cannot be fetched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn view_product(&self, id: &ProductId) -> Result<String, CatalogError> {
        self.api.get_product(id).await?;
        Ok(id.detail_path())
    }
}
