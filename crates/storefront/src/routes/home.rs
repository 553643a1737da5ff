//! Storefront landing page: the product grid next to the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use duka_core::Product;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::CartView;
use crate::services::CartService;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
}

impl ProductCardView {
    /// Build a card; products without an id cannot be carted and are skipped.
    fn from_product(product: &Product) -> Option<Self> {
        let id = product.id.as_ref()?;
        Some(Self {
            id: id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            price: product.price.to_string(),
        })
    }
}

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    pub catalog_error: Option<String>,
}

/// Display the storefront page.
///
/// A catalog failure still renders the page (with the saved cart) and a
/// failure message in place of the product grid.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let (products, catalog_error) = match state.catalog().list_products().await {
        Ok(products) => (
            products
                .iter()
                .filter_map(ProductCardView::from_product)
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (Vec::new(), Some("Failed to fetch products".to_string()))
        }
    };

    let cart = CartService::load(&session).await.into_cart();

    HomeTemplate {
        products,
        cart: CartView::from(&cart),
        catalog_error,
    }
}
