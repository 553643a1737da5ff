//! Session-persisted shopping cart.
//!
//! The cart lives in the visitor's session as a JSON snapshot under
//! [`CART_STORAGE_KEY`]. A [`CartService`] is built once per request: it
//! hydrates the cart, applies one mutation, writes the snapshot back, and
//! hands the post-mutation cart to the renderer.

use std::future::Future;

use duka_core::{AddOutcome, CART_STORAGE_KEY, Cart, Product, ProductId};
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

/// Errors that can occur while persisting the cart.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The session backend failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The cart could not be serialized.
    #[error("cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Per-visitor key-value storage holding the cart snapshot.
pub trait CartStore {
    /// Read the raw snapshot, `None` if nothing has been stored.
    fn load_snapshot(&self) -> impl Future<Output = Result<Option<String>, CartStoreError>> + Send;

    /// Replace the stored snapshot.
    fn save_snapshot(
        &self,
        snapshot: String,
    ) -> impl Future<Output = Result<(), CartStoreError>> + Send;
}

impl CartStore for Session {
    async fn load_snapshot(&self) -> Result<Option<String>, CartStoreError> {
        match self.get::<String>(CART_STORAGE_KEY).await {
            Ok(snapshot) => Ok(snapshot),
            // A value of the wrong type reads as an empty cart.
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::debug!(error = %e, "Ignoring malformed cart in session");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_snapshot(&self, snapshot: String) -> Result<(), CartStoreError> {
        self.insert(CART_STORAGE_KEY, snapshot).await?;
        Ok(())
    }
}

/// Request-scoped cart: hydrated on construction, flushed after each change.
pub struct CartService<'a, S> {
    store: &'a S,
    cart: Cart,
}

impl<'a, S: CartStore + Sync> CartService<'a, S> {
    /// Hydrate the cart from `store`.
    ///
    /// A failing or corrupt store yields an empty cart rather than an error.
    pub async fn load(store: &'a S) -> Self {
        let snapshot = match store.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart, starting empty");
                None
            }
        };

        Self {
            store,
            cart: Cart::hydrate(snapshot.as_deref()),
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Badge count, recomputed from the lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart.total_quantity()
    }

    /// Add one unit of `id` from `catalog`, then persist.
    ///
    /// Ids missing from `catalog` are a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError` if the updated cart cannot be saved.
    #[instrument(skip(self, catalog), fields(product_id = %id))]
    pub async fn add(
        &mut self,
        catalog: &[Product],
        id: &ProductId,
    ) -> Result<AddOutcome, CartStoreError> {
        let outcome = self.cart.add_from_catalog(catalog, id);
        if outcome.changed() {
            self.persist().await?;
        } else {
            tracing::debug!("Product not in catalog, cart unchanged");
        }
        Ok(outcome)
    }

    /// Remove the whole line for `id`, then persist.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError` if the updated cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove(&mut self, id: &ProductId) -> Result<bool, CartStoreError> {
        let removed = self.cart.remove(id);
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Empty the cart, then persist.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError` if the updated cart cannot be saved.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<(), CartStoreError> {
        self.cart.clear();
        self.persist().await
    }

    /// Give up the cart for rendering.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    async fn persist(&self) -> Result<(), CartStoreError> {
        let snapshot = self.cart.snapshot()?;
        self.store.save_snapshot(snapshot).await?;
        tracing::debug!(
            lines = self.cart.lines().len(),
            total_quantity = self.cart.total_quantity(),
            "Cart saved"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use duka_core::Price;

    use super::*;

    /// In-memory stand-in for the session.
    #[derive(Default)]
    pub struct MemoryCartStore {
        pub snapshot: Mutex<Option<String>>,
        pub writes: Mutex<usize>,
    }

    impl MemoryCartStore {
        pub fn with_snapshot(raw: &str) -> Self {
            Self {
                snapshot: Mutex::new(Some(raw.to_string())),
                writes: Mutex::new(0),
            }
        }

        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    impl CartStore for MemoryCartStore {
        async fn load_snapshot(&self) -> Result<Option<String>, CartStoreError> {
            Ok(self.snapshot.lock().unwrap().clone())
        }

        async fn save_snapshot(&self, snapshot: String) -> Result<(), CartStoreError> {
            *self.snapshot.lock().unwrap() = Some(snapshot);
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }
    }

    pub fn product(id: &str, price: u64) -> Product {
        Product {
            id: Some(ProductId::new(id)),
            name: format!("Item {id}"),
            category: "General".to_string(),
            brand: "Acme".to_string(),
            image_url: String::new(),
            description: String::new(),
            price: Price::from_units(price),
        }
    }

    #[tokio::test]
    async fn test_add_persists_before_next_read() {
        let store = MemoryCartStore::default();
        let catalog = vec![product("1", 10)];

        let mut service = CartService::load(&store).await;
        service.add(&catalog, &ProductId::new("1")).await.unwrap();
        service.add(&catalog, &ProductId::new("1")).await.unwrap();
        assert_eq!(service.count(), 2);

        let reloaded = CartService::load(&store).await;
        assert_eq!(reloaded.cart(), service.cart());
        assert_eq!(reloaded.count(), 2);
    }

    #[tokio::test]
    async fn test_add_unknown_product_does_not_write() {
        let store = MemoryCartStore::default();
        let mut service = CartService::load(&store).await;

        let outcome = service
            .add(&[product("1", 10)], &ProductId::new("nope"))
            .await
            .unwrap();

        assert_eq!(outcome, AddOutcome::NotInCatalog);
        assert_eq!(store.writes(), 0);
        assert_eq!(service.count(), 0);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let store = MemoryCartStore::default();
        let mut service = CartService::load(&store).await;

        assert!(!service.remove(&ProductId::new("x")).await.unwrap());
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_add_add_add_remove_sequence() {
        let store = MemoryCartStore::default();
        let catalog = vec![product("A", 10), product("B", 20)];
        let mut service = CartService::load(&store).await;

        service.add(&catalog, &ProductId::new("A")).await.unwrap();
        service.add(&catalog, &ProductId::new("A")).await.unwrap();
        service.add(&catalog, &ProductId::new("B")).await.unwrap();
        assert!(service.remove(&ProductId::new("A")).await.unwrap());

        assert_eq!(service.count(), 1);
        assert_eq!(CartService::load(&store).await.count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_loads_empty() {
        let store = MemoryCartStore::with_snapshot("]]garbage");
        let service = CartService::load(&store).await;
        assert!(service.cart().is_empty());
    }

    #[tokio::test]
    async fn test_clear_persists_empty_array() {
        let store = MemoryCartStore::with_snapshot(r#"[{"id":"1","price":10,"quantity":2}]"#);
        let mut service = CartService::load(&store).await;
        assert_eq!(service.count(), 2);

        service.clear().await.unwrap();
        assert_eq!(store.snapshot.lock().unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_session_store_round_trip() {
        use std::sync::Arc;
        use tower_sessions::MemoryStore;

        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(session.load_snapshot().await.unwrap(), None);

        let mut service = CartService::load(&session).await;
        service.add(&[product("7", 3)], &ProductId::new("7")).await.unwrap();

        let reloaded = CartService::load(&session).await;
        assert_eq!(reloaded.count(), 1);
    }
}
