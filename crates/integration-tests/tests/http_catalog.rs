//! Integration tests for `HttpCatalogClient`.
//!
//! Serves a small catalog API from an `axum` router on an ephemeral port.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::CartManager;
use rocketshoes_cart::catalog::{ApiError, CatalogApi, HttpCatalogClient};
use rocketshoes_cart::error::STOCK_EXHAUSTED_MESSAGE;
use rocketshoes_cart::notifier::CollectingNotifier;
use rocketshoes_cart::storage::MemoryStore;
use rocketshoes_core::{Price, ProductId};
use serde_json::json;
use url::Url;

// =============================================================================
// Test Server
// =============================================================================

async fn stock(Path(id): Path<u32>) -> Response {
    match id {
        1 => Json(json!({ "id": 1, "amount": 2 })).into_response(),
        2 => Json(json!({ "id": 2, "amount": 0 })).into_response(),
        5 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        6 => "not json".into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn product(State(hits): State<Arc<AtomicUsize>>, Path(id): Path<u32>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    match id {
        1 | 2 => Json(json!({
            "id": id,
            "name": format!("Tênis {id}"),
            "price": 179.9,
            "image": "ignored",
            "imageUrl": format!("https://cdn.example.com/{id}.jpg"),
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

/// Start the catalog server, returning its API base URL and a counter of
/// product requests.
async fn spawn_catalog() -> (Url, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/stock/{id}", get(stock))
        .route("/api/products/{id}", get(product))
        .with_state(Arc::clone(&hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}/api")).unwrap(), hits)
}

// =============================================================================
// Client Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_stock() {
    let (base, _) = spawn_catalog().await;
    let client = HttpCatalogClient::new(&base, Duration::ZERO).unwrap();

    let stock = client.stock(ProductId::new(1)).await.unwrap();
    assert_eq!(stock.id, ProductId::new(1));
    assert_eq!(stock.amount, 2);
}

#[tokio::test]
async fn test_fetch_product() {
    let (base, _) = spawn_catalog().await;
    let client = HttpCatalogClient::new(&base, Duration::ZERO).unwrap();

    let product = client.product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.name, "Tênis 1");
    assert_eq!(product.price, Price::from_cents(17990));
    assert_eq!(product.image_url, "https://cdn.example.com/1.jpg");
}

#[tokio::test]
async fn test_missing_resource_is_not_found() {
    let (base, _) = spawn_catalog().await;
    let client = HttpCatalogClient::new(&base, Duration::ZERO).unwrap();

    let err = client.stock(ProductId::new(42)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref path) if path == "stock/42"));
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let (base, _) = spawn_catalog().await;
    let client = HttpCatalogClient::new(&base, Duration::ZERO).unwrap();

    let err = client.stock(ProductId::new(5)).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (base, _) = spawn_catalog().await;
    let client = HttpCatalogClient::new(&base, Duration::ZERO).unwrap();

    let err = client.stock(ProductId::new(6)).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let client = HttpCatalogClient::new(&base, Duration::ZERO).unwrap();

    let err = client.stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}

#[tokio::test]
async fn test_product_records_are_cached() {
    let (base, hits) = spawn_catalog().await;
    let client = HttpCatalogClient::new(&base, Duration::from_secs(60)).unwrap();

    client.product(ProductId::new(1)).await.unwrap();
    client.product(ProductId::new(1)).await.unwrap();
    client.product(ProductId::new(2)).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_zero_ttl_disables_cache() {
    let (base, hits) = spawn_catalog().await;
    let client = HttpCatalogClient::new(&base, Duration::ZERO).unwrap();

    client.product(ProductId::new(1)).await.unwrap();
    client.product(ProductId::new(1)).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test]
async fn test_cart_against_http_catalog() {
    let (base, _) = spawn_catalog().await;
    let notifier = Arc::new(CollectingNotifier::new());
    let manager = CartManager::new(
        HttpCatalogClient::new(&base, Duration::from_secs(60)).unwrap(),
        MemoryStore::new(),
        Arc::clone(&notifier),
    );

    manager.add_product(ProductId::new(1)).await;
    manager.add_product(ProductId::new(1)).await;
    manager.add_product(ProductId::new(1)).await;
    manager.add_product(ProductId::new(2)).await;

    let cart = manager.cart();
    assert_eq!(cart.len(), 1);
    let line = cart.get(ProductId::new(1)).unwrap();
    assert_eq!(line.amount, 2);
    assert_eq!(line.subtotal(), Price::from_cents(35980));
    assert_eq!(notifier.take(), vec![STOCK_EXHAUSTED_MESSAGE.to_string()]);
}
