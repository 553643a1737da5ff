//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product cards, cart panel and badge
//! GET  /health                 - Health check
//!
//! # Cart (fragments when requested with X-Cart-Fragment, redirect to / otherwise)
//! GET  /cart                   - Cart panel fragment
//! POST /cart/add               - Add one unit of a product
//! POST /cart/remove            - Remove a product's whole line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge fragment
//! ```

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/cart", cart_routes())
}
