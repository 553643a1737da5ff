//! Integration tests for the storefront cart.
//!
//! A cookie-keeping client plays the visitor's browser; the cart snapshot
//! lives in that visitor's session between requests.

use axum::http::StatusCode;
use duka_integration_tests::{
    FakeBackend, browser, product, spawn_app, storefront_config,
};
use duka_storefront::state::AppState;

struct Storefront {
    backend: FakeBackend,
    url: String,
    client: reqwest::Client,
}

impl Storefront {
    async fn start() -> Self {
        let backend = FakeBackend::start(vec![
            product("A", "Sufuria", 25),
            product("B", "Jiko", 40),
        ])
        .await;
        let app = duka_storefront::app(AppState::new(storefront_config(&backend)));
        Self {
            url: spawn_app(app).await,
            backend,
            client: browser(),
        }
    }

    async fn post(&self, path: &str, product_id: Option<&str>) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}{path}", self.url))
            .header("X-Cart-Fragment", "1");
        if let Some(id) = product_id {
            request = request.form(&[("product_id", id)]);
        }
        request.send().await.unwrap()
    }

    async fn add(&self, id: &str) -> reqwest::Response {
        self.post("/cart/add", Some(id)).await
    }

    async fn remove(&self, id: &str) -> reqwest::Response {
        self.post("/cart/remove", Some(id)).await
    }

    async fn count(&self) -> u64 {
        let body = self
            .client
            .get(format!("{}/cart/count", self.url))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        body.trim().parse().unwrap()
    }
}

#[tokio::test]
async fn test_add_twice_gives_one_line_quantity_two() {
    let store = Storefront::start().await;

    store.add("A").await;
    let response = store.add("A").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-cart-event"], "cart-updated");

    let panel = response.text().await.unwrap();
    assert_eq!(panel.matches("Quantity: 2").count(), 1);
    assert!(panel.contains("Total Price: Kshs. 50"));
    assert_eq!(store.count().await, 2);
}

#[tokio::test]
async fn test_add_add_add_remove_sequence() {
    let store = Storefront::start().await;

    store.add("A").await;
    store.add("A").await;
    store.add("B").await;
    store.remove("A").await;

    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_unknown_product_is_ignored() {
    let store = Storefront::start().await;

    let response = store.add("nope").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Your cart is empty."));
    assert_eq!(store.count().await, 0);
}

#[tokio::test]
async fn test_remove_absent_is_noop() {
    let store = Storefront::start().await;
    store.add("B").await;

    let response = store.remove("A").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_cart_is_per_visitor() {
    let store = Storefront::start().await;
    store.add("A").await;

    let stranger = browser();
    let body = stranger
        .get(format!("{}/cart/count", store.url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body.trim(), "0");
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_catalog_failure_on_add_keeps_cart() {
    let store = Storefront::start().await;
    store.add("A").await;

    store
        .backend
        .fail_with(Some(StatusCode::INTERNAL_SERVER_ERROR));
    let response = store.add("B").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    store.backend.fail_with(None);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let store = Storefront::start().await;
    store.add("A").await;
    store.add("B").await;

    let response = store.post("/cart/clear", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.count().await, 0);
}

#[tokio::test]
async fn test_home_page_lists_products_and_cart() {
    let store = Storefront::start().await;
    store.add("B").await;

    let page = store
        .client
        .get(&store.url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Sufuria"));
    assert!(page.contains(r#"data-product-id="A""#));
    assert!(page.contains(r#"<span id="cart-count">1</span>"#));
}

#[tokio::test]
async fn test_plain_form_post_redirects_home() {
    let store = Storefront::start().await;

    let response = store
        .client
        .post(format!("{}/cart/add", store.url))
        .form(&[("product_id", "A")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");
    assert_eq!(store.count().await, 1);
}
