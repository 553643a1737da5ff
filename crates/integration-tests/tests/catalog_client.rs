//! Integration tests for the product REST clients.
//!
//! Both the admin client (full CRUD) and the storefront client (read-only)
//! run against the in-process fake backend.

use axum::{
    Router,
    http::{Method, StatusCode},
    routing::get,
};
use duka_admin::catalog::{AdminCatalogClient, CatalogError, ProductApi};
use duka_core::{Price, ProductId, ProductPatch};
use duka_integration_tests::{FakeBackend, product};
use duka_storefront::catalog::{CatalogClient, CatalogError as StorefrontCatalogError};
use url::Url;

async fn seeded() -> FakeBackend {
    FakeBackend::start(vec![
        product("1", "Sufuria", 1200),
        product("2", "Jiko", 3500),
    ])
    .await
}

// =============================================================================
// Admin Client
// =============================================================================

#[tokio::test]
async fn test_list_and_get() {
    let backend = seeded().await;
    let client = AdminCatalogClient::new(backend.url());

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Sufuria");

    let jiko = client.get_product(&ProductId::new("2")).await.unwrap();
    assert_eq!(jiko.price, Price::from_units(3500));
}

#[tokio::test]
async fn test_get_unknown_is_not_found() {
    let backend = seeded().await;
    let client = AdminCatalogClient::new(backend.url());

    let err = client.get_product(&ProductId::new("404")).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn test_create_sends_json_without_id() {
    let backend = seeded().await;
    let client = AdminCatalogClient::new(backend.url());

    let mut draft = product("ignored", "Kikapu", 450);
    draft.price = "450.50".parse().unwrap();
    client.create_product(&draft).await.unwrap();

    let request = backend.requests().pop().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let body = request.body.unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(body["imageUrl"], "https://img.duka.test/ignored.jpg");
    assert_eq!(body["price"], serde_json::json!(450.5));

    let created = backend.products().pop().unwrap();
    assert_eq!(created.name, "Kikapu");
    assert!(created.is_saved());
}

#[tokio::test]
async fn test_update_sends_only_patched_fields() {
    let backend = seeded().await;
    let client = AdminCatalogClient::new(backend.url());

    let patch = ProductPatch {
        name: Some("Sufuria kubwa".to_string()),
        ..ProductPatch::default()
    };
    client
        .update_product(&ProductId::new("1"), &patch)
        .await
        .unwrap();

    let request = backend.requests().pop().unwrap();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.path, "/products/1");
    assert_eq!(request.body.unwrap(), serde_json::json!({"name": "Sufuria kubwa"}));

    let updated = &backend.products()[0];
    assert_eq!(updated.name, "Sufuria kubwa");
    assert_eq!(updated.brand, "Jikoni");
}

#[tokio::test]
async fn test_delete_has_no_body() {
    let backend = seeded().await;
    let client = AdminCatalogClient::new(backend.url());

    client.delete_product(&ProductId::new("2")).await.unwrap();

    let request = backend.requests().pop().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert!(request.body.is_none());
    assert_eq!(backend.products().len(), 1);
}

#[tokio::test]
async fn test_ids_are_percent_encoded() {
    let backend = FakeBackend::start(vec![product("a/b c", "Mkeka", 800)]).await;
    let client = AdminCatalogClient::new(backend.url());

    let mkeka = client.get_product(&ProductId::new("a/b c")).await.unwrap();
    assert_eq!(mkeka.name, "Mkeka");
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let backend = seeded().await;
    let client = AdminCatalogClient::new(backend.url());
    backend.fail_with(Some(StatusCode::SERVICE_UNAVAILABLE));

    let err = client.delete_product(&ProductId::new("1")).await.unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Status { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
    ));
    // Nothing was applied and nothing was retried.
    assert_eq!(backend.products().len(), 2);
    assert_eq!(backend.requests().len(), 1);
}

// =============================================================================
// Storefront Client
// =============================================================================

#[tokio::test]
async fn test_storefront_client_reads_catalog() {
    let backend = seeded().await;
    let client = CatalogClient::with_base_url(backend.url());

    let products = client.list_products().await.unwrap();
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Sufuria", "Jiko"]);
    assert_eq!(backend.requests()[0].path, "/products");
}

#[tokio::test]
async fn test_clients_tolerate_numeric_ids_and_bad_rows() {
    let body = r#"[{"id":1,"name":"Sufuria","price":1200},{"id":2,"name":"No price"}]"#;
    let router = Router::new().route("/products", get(move || async move { body }));
    let url = Url::parse(&duka_integration_tests::spawn_app(router).await).unwrap();

    let storefront = CatalogClient::with_base_url(&url).list_products().await.unwrap();
    let admin = AdminCatalogClient::new(&url).list_products().await.unwrap();

    for products in [storefront, admin] {
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, Some(ProductId::new("1")));
    }
}

#[tokio::test]
async fn test_storefront_client_surfaces_error_status() {
    let backend = seeded().await;
    backend.fail_with(Some(StatusCode::INTERNAL_SERVER_ERROR));
    let client = CatalogClient::with_base_url(backend.url());

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, StorefrontCatalogError::Status { .. }));
}
