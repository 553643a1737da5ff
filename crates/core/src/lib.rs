//! Duka Core - Shared types library.
//!
//! This crate provides common types used across all Duka components:
//! - `storefront` - Customer-facing catalog and cart
//! - `admin` - Catalog management screens
//! - `cli` - Command-line catalog tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no sessions,
//! no HTTP clients. Persistence of the cart is expressed as a JSON snapshot
//! that callers store wherever they keep per-visitor state.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, products, cart lines and the cart model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
