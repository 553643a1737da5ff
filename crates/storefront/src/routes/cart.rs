//! Cart route handlers.
//!
//! Every mutation hydrates the cart from the session, applies the change,
//! saves the snapshot, and renders from the saved state. Requests carrying
//! `X-Cart-Fragment` get the cart panel fragment back (plus an `X-Cart-Event`
//! so the badge refreshes); plain form posts are redirected to the storefront.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use duka_core::{Cart, CartLine, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::CartService;
use crate::state::AppState;

/// Header set by the page script on fragment requests.
pub const FRAGMENT_HEADER: &str = "x-cart-fragment";

/// Response header naming the cart event that just happened.
pub const CART_EVENT_HEADER: &str = "x-cart-event";

/// Event name the page script listens for to refresh the badge.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id().map(ToString::to_string).unwrap_or_default(),
            name: line.product.name.clone(),
            image_url: line.product.image_url.clone(),
            price: line.product.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().to_string(),
            item_count: cart.total_quantity(),
        }
    }
}

/// Form body shared by add and remove.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: String,
}

impl CartItemForm {
    fn product_id(&self) -> Result<ProductId> {
        let id = self.product_id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("missing product_id".to_string()));
        }
        Ok(ProductId::new(id))
    }
}

/// Cart panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

fn is_fragment_request(headers: &HeaderMap) -> bool {
    headers.contains_key(FRAGMENT_HEADER)
}

/// Respond after a mutation, rendering from the post-mutation cart.
fn mutation_response(headers: &HeaderMap, cart: &Cart) -> Response {
    if is_fragment_request(headers) {
        (
            AppendHeaders([(CART_EVENT_HEADER, CART_UPDATED_EVENT)]),
            CartPanelTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

/// Cart panel fragment.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let service = CartService::load(&session).await;
    CartPanelTemplate {
        cart: CartView::from(service.cart()),
    }
}

/// Add one unit of a product to the cart.
///
/// The catalog is fetched first; ids it does not contain leave the cart as is.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let id = form.product_id()?;
    let catalog = state.catalog().list_products().await?;

    let mut service = CartService::load(&session).await;
    let outcome = service.add(&catalog, &id).await?;
    if outcome.changed() {
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    }

    Ok(mutation_response(&headers, service.cart()))
}

/// Remove a product's whole line from the cart.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let id = form.product_id()?;

    let mut service = CartService::load(&session).await;
    if service.remove(&id).await? {
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", id.as_str())]),
        );
    }

    Ok(mutation_response(&headers, service.cart()))
}

/// Empty the cart.
#[instrument(skip(session, headers))]
pub async fn clear(session: Session, headers: HeaderMap) -> Result<Response> {
    let mut service = CartService::load(&session).await;
    service.clear().await?;
    add_breadcrumb("cart", "Cleared cart", None);

    Ok(mutation_response(&headers, service.cart()))
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let service = CartService::load(&session).await;
    CartCountTemplate {
        count: service.count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use duka_core::Price;

    use super::*;
    use crate::services::cart::tests::product;

    #[test]
    fn test_cart_view_from_cart() {
        let mut cart = Cart::new();
        let mut scarf = product("1", 25);
        scarf.name = "Kikoi scarf".to_string();
        cart.add(&scarf).unwrap();
        cart.add(&scarf).unwrap();
        cart.add(&scarf).unwrap();

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name, "Kikoi scarf");
        assert_eq!(view.items[0].line_total, Price::from_units(75).to_string());
        assert_eq!(view.subtotal, "Kshs. 75");
    }

    #[test]
    fn test_blank_product_id_is_rejected() {
        let form = CartItemForm {
            product_id: "  ".to_string(),
        };
        assert!(matches!(form.product_id(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_fragment_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_fragment_request(&headers));
        headers.insert(FRAGMENT_HEADER, "true".parse().unwrap());
        assert!(is_fragment_request(&headers));
    }
}
