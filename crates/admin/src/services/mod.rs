//! Business logic services for admin.
//!
//! # Services
//!
//! - `products` - Product table state and CRUD flows

pub mod products;

pub use products::ProductsManager;
