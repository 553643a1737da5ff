//! Integration tests for Duka.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p duka-integration-tests
//! ```
//!
//! No external services are needed: [`FakeBackend`] serves the product REST
//! API in-process on an ephemeral port, and the storefront and admin routers
//! are spawned the same way with [`spawn_app`].
//!
//! # Test Categories
//!
//! - `catalog_client` - Admin REST client against the fake backend
//! - `storefront_cart` - Cart flows through the storefront with a real cookie jar
//! - `admin_products` - Product table flows through the admin

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use duka_core::{Price, Product, ProductId, ProductPatch};
use url::Url;

/// A request the fake backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
struct BackendInner {
    products: Vec<Product>,
    next_id: u64,
    failure: Option<StatusCode>,
    requests: Vec<RecordedRequest>,
}

/// In-process stand-in for the product REST API.
#[derive(Clone)]
pub struct FakeBackend {
    inner: Arc<Mutex<BackendInner>>,
    url: Url,
}

impl FakeBackend {
    /// Start a backend holding `products`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(products: Vec<Product>) -> Self {
        let inner = Arc::new(Mutex::new(BackendInner {
            products,
            next_id: 1000,
            ..BackendInner::default()
        }));
        let placeholder = Self {
            inner,
            url: Url::parse("http://127.0.0.1").expect("static URL"),
        };

        let router = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/{id}",
                get(get_product).patch(update_product).delete(delete_product),
            )
            .with_state(placeholder.clone());
        let addr = spawn_router(router).await;

        Self {
            url: Url::parse(&format!("http://{addr}")).expect("socket address URL"),
            ..placeholder
        }
    }

    /// Base URL to configure clients with.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Answer every request with `status` until cleared with `None`.
    pub fn fail_with(&self, status: Option<StatusCode>) {
        self.lock().failure = status;
    }

    /// Current backend contents.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, BackendInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the request and return the injected failure, if any.
    fn record(
        &self,
        method: Method,
        path: String,
        headers: &HeaderMap,
        body: Option<serde_json::Value>,
    ) -> Option<StatusCode> {
        let mut inner = self.lock();
        inner.requests.push(RecordedRequest {
            method,
            path,
            content_type: headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            body,
        });
        inner.failure
    }
}

async fn list_products(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    if let Some(status) = backend.record(Method::GET, "/products".into(), &headers, None) {
        return status.into_response();
    }
    Json(backend.products()).into_response()
}

async fn get_product(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(status) = backend.record(Method::GET, format!("/products/{id}"), &headers, None) {
        return status.into_response();
    }
    let id = ProductId::new(id);
    backend
        .products()
        .into_iter()
        .find(|p| p.id.as_ref() == Some(&id))
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |p| Json(p).into_response(),
        )
}

async fn create_product(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if let Some(status) =
        backend.record(Method::POST, "/products".into(), &headers, Some(body.clone()))
    {
        return status.into_response();
    }
    let Ok(mut product) = serde_json::from_value::<Product>(body) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    let mut inner = backend.lock();
    inner.next_id += 1;
    product.id = Some(ProductId::new(inner.next_id.to_string()));
    inner.products.push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if let Some(status) = backend.record(
        Method::PATCH,
        format!("/products/{id}"),
        &headers,
        Some(body.clone()),
    ) {
        return status.into_response();
    }
    let Ok(patch) = serde_json::from_value::<ProductPatch>(body) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    let id = ProductId::new(id);
    let mut inner = backend.lock();
    match inner.products.iter_mut().find(|p| p.id.as_ref() == Some(&id)) {
        Some(product) => {
            patch.apply_to(product);
            Json(product.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_product(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(status) =
        backend.record(Method::DELETE, format!("/products/{id}"), &headers, None)
    {
        return status.into_response();
    }
    let id = ProductId::new(id);
    let mut inner = backend.lock();
    let before = inner.products.len();
    inner.products.retain(|p| p.id.as_ref() != Some(&id));
    if inner.products.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Serve `router` on an ephemeral local port.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

/// Serve an application router and return its base URL.
pub async fn spawn_app(router: Router) -> String {
    format!("http://{}", spawn_router(router).await)
}

/// Storefront configuration pointing at `backend`.
///
/// # Panics
///
/// Never in practice; the literal addresses parse.
#[must_use]
pub fn storefront_config(backend: &FakeBackend) -> duka_storefront::config::StorefrontConfig {
    duka_storefront::config::StorefrontConfig {
        host: "127.0.0.1".parse().expect("literal address"),
        port: 0,
        base_url: "http://localhost".to_string(),
        catalog: duka_storefront::config::CatalogApiConfig {
            base_url: backend.url().clone(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Admin configuration pointing at `backend`.
///
/// # Panics
///
/// Never in practice; the literal address parses.
#[must_use]
pub fn admin_config(backend: &FakeBackend) -> duka_admin::config::AdminConfig {
    duka_admin::config::AdminConfig {
        host: "127.0.0.1".parse().expect("literal address"),
        port: 0,
        base_url: "http://localhost".to_string(),
        catalog_api_url: backend.url().clone(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A saved product for fixtures.
#[must_use]
pub fn product(id: &str, name: &str, price: u64) -> Product {
    Product {
        id: Some(ProductId::new(id)),
        name: name.to_string(),
        category: "Kitchen".to_string(),
        brand: "Jikoni".to_string(),
        image_url: format!("https://img.duka.test/{id}.jpg"),
        description: format!("{name} for every home"),
        price: Price::from_units(price),
    }
}

/// HTTP client that keeps cookies between requests and does not follow
/// redirects, so tests can assert on them.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialised.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}
