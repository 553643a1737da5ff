//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /                       - Redirect to /products
//!
//! # Products (full CRUD against the product REST API)
//! GET  /products               - Product table (modal open while editing)
//! GET  /products/new           - Table with a blank add form
//! GET  /products/{id}/edit     - Table with the edit form for {id}
//! GET  /products/{id}/open     - Check {id} exists, redirect to its detail view
//! POST /products/{id}/delete   - Delete {id}
//! POST /products/form          - Save the add/edit form
//! POST /products/form/close    - Close the form without saving
//! GET  /products/view?id={id}  - Product detail view
//! ```

pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the products routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/new", get(products::new))
        .route("/view", get(products::show))
        .route("/form", post(products::submit))
        .route("/form/close", post(products::close))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}/open", get(products::open))
        .route("/{id}/delete", post(products::delete))
}

/// Create all routes for the admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .nest("/products", product_routes())
}
