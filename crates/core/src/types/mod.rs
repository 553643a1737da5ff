//! Core types for Duka.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{AddOutcome, CART_STORAGE_KEY, Cart, CartLine};
pub use id::ProductId;
pub use price::{CURRENCY_PREFIX, Price, PriceError};
pub use product::{Product, ProductError, ProductPatch};
