//! Shopping cart model.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, at most one per product id,
//! kept in order of first add. It has no durable home of its own: callers
//! hydrate it from a JSON snapshot at the start of a request and write
//! [`Cart::snapshot`] back after every mutation.
//!
//! # Example
//!
//! ```rust
//! use duka_core::{AddOutcome, Cart, Price, Product, ProductId};
//!
//! let catalog = vec![Product {
//!     id: Some(ProductId::new("1")),
//!     name: "Unga".to_string(),
//!     category: "Pantry".to_string(),
//!     brand: "Jogoo".to_string(),
//!     image_url: String::new(),
//!     description: "2kg maize flour".to_string(),
//!     price: Price::from_units(10),
//! }];
//!
//! let mut cart = Cart::hydrate(None);
//! cart.add_from_catalog(&catalog, &ProductId::new("1"));
//! assert_eq!(
//!     cart.add_from_catalog(&catalog, &ProductId::new("1")),
//!     AddOutcome::Incremented { quantity: 2 }
//! );
//! assert_eq!(cart.total_quantity(), 2);
//!
//! let restored = Cart::hydrate(cart.snapshot().ok().as_deref());
//! assert_eq!(restored, cart);
//! ```

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::{Product, ProductError};

/// Storage key under which the cart snapshot is kept.
pub const CART_STORAGE_KEY: &str = "cart";

const fn default_quantity() -> u32 {
    1
}

/// One distinct product in the cart and how many of it the shopper wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    /// Start a line for `product` with a quantity of one.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// The product id this line is keyed by.
    #[must_use]
    pub const fn id(&self) -> Option<&ProductId> {
        self.product.id.as_ref()
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Result of an add-to-cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Added,
    /// An existing line's quantity was bumped.
    Incremented { quantity: u32 },
    /// The product id is not in the loaded catalog; the cart is unchanged.
    NotInCatalog,
}

impl AddOutcome {
    /// Whether the cart was modified.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::NotInCatalog)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from a stored snapshot.
    ///
    /// Missing, non-JSON, or wrongly shaped data (including lines without an
    /// id) all yield an empty cart. A stored quantity of zero reads as one, and
    /// repeated ids are folded into their first line.
    #[must_use]
    pub fn hydrate(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::new();
        };

        let lines: Vec<CartLine> = match serde_json::from_str(raw) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding unreadable cart snapshot");
                return Self::new();
            }
        };

        if lines.iter().any(|line| line.id().is_none()) {
            tracing::debug!("Discarding cart snapshot with unidentified lines");
            return Self::new();
        }

        let mut cart = Self::new();
        for mut line in lines {
            line.quantity = line.quantity.max(1);
            match cart.position(line.id()) {
                Some(index) => {
                    if let Some(existing) = cart.lines.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Serialize the cart as a JSON array of lines.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Lines in order of first add.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == Some(id))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of the product with `id`, looked up in `catalog`.
    ///
    /// Unknown ids leave the cart untouched.
    pub fn add_from_catalog(&mut self, catalog: &[Product], id: &ProductId) -> AddOutcome {
        catalog
            .iter()
            .find(|product| product.id.as_ref() == Some(id))
            .and_then(|product| self.add(product).ok())
            .unwrap_or(AddOutcome::NotInCatalog)
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Unsaved` if the product has no id.
    pub fn add(&mut self, product: &Product) -> Result<AddOutcome, ProductError> {
        let id = product.require_id()?;

        if let Some(line) = self.lines.iter_mut().find(|line| line.id() == Some(id)) {
            line.quantity = line.quantity.saturating_add(1);
            return Ok(AddOutcome::Incremented {
                quantity: line.quantity,
            });
        }

        self.lines.push(CartLine::new(product.clone()));
        Ok(AddOutcome::Added)
    }

    /// Remove the whole line for `id`, regardless of its quantity.
    ///
    /// Returns `false` if there was no such line.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        match self.position(Some(id)) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines. Always recomputed from the lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn position(&self, id: Option<&ProductId>) -> Option<usize> {
        id.and_then(|id| self.lines.iter().position(|line| line.id() == Some(id)))
    }
}
