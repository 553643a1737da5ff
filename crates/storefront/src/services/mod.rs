//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-persisted shopping cart

pub mod cart;

pub use cart::{CartService, CartStore, CartStoreError};
