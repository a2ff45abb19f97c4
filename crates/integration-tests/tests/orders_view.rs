//! Integration tests for the orders table over an in-memory store.
//!
//! Each test serves the real router on an ephemeral port.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use orderdesk_admin::{
    state::AppState,
    store::{Document, MemoryStore},
};
use orderdesk_integration_tests::{TestApp, count, order_json, simple_order, test_config};
use reqwest::StatusCode;
use serde_json::json;

fn store_of(ids: &[&str]) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new().with_collection(
        "orders",
        ids.iter().map(|id| simple_order(id)).collect(),
    ))
}

#[tokio::test]
async fn test_pages_through_orders() {
    let app = TestApp::spawn(store_of(&["a", "b", "c", "d", "e"]), 2).await;
    app.mount().await;

    let (status, first) = app.get("/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&first, "class=\"order-row\""), 2);
    assert!(first.contains("1–2 of 5"));
    assert!(first.contains("href=\"/orders?page=1\""));

    let (_, second) = app.get("/orders?page=1").await;
    assert_eq!(count(&second, "class=\"order-row\""), 2);
    assert!(second.contains("data-order-id=\"c\""));
    assert!(second.contains("data-order-id=\"d\""));

    let (_, last) = app.get("/orders?page=2").await;
    assert_eq!(count(&last, "class=\"order-row\""), 1);
    assert!(last.contains("5–5 of 5"));
    assert!(last.contains("pagination-next disabled"));
}

#[tokio::test]
async fn test_row_contents() {
    let doc: Document = serde_json::from_value(order_json(
        "ord-1",
        "Ada Lovelace",
        &[("Pen", 1.5, 3), ("Notebook", 4.0, 1)],
        12.5,
    ))
    .unwrap();
    let store = Arc::new(MemoryStore::new().with_collection("orders", vec![doc]));
    let app = TestApp::spawn(store, 2).await;
    app.mount().await;

    let (_, body) = app.get("/orders").await;
    assert!(body.contains("ord-1"));
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("42 Harbor Rd"));
    assert!(body.contains("555-0123"));
    assert!(body.contains("Pen (x3)"));
    assert!(body.contains("Notebook (x1)"));
    assert!(body.contains("$12.50"));
    assert!(body.contains("/2024, "));
}

#[tokio::test]
async fn test_empty_collection() {
    let app = TestApp::spawn(store_of(&[]), 2).await;
    app.mount().await;

    let (status, body) = app.get("/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&body, "class=\"order-row\""), 0);
    assert_eq!(count(&body, "error-row"), 0);
    assert!(body.contains("0–0 of 0"));
    assert!(body.contains("No orders found"));
}

#[tokio::test]
async fn test_page_size_zero_shows_everything() {
    let app = TestApp::spawn(store_of(&["a", "b", "c", "d", "e"]), 0).await;
    app.mount().await;

    let (_, body) = app.get("/orders").await;
    assert_eq!(count(&body, "class=\"order-row\""), 5);
    assert!(!body.contains("class=\"pagination\""));
}

#[tokio::test]
async fn test_malformed_document_shows_error_row() {
    let mut bad = simple_order("bad");
    bad.fields.remove("totalPrice");
    let store = Arc::new(
        MemoryStore::new().with_collection("orders", vec![simple_order("ok"), bad]),
    );
    let app = TestApp::spawn(store, 2).await;
    app.mount().await;

    let (status, body) = app.get("/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&body, "class=\"error-row\""), 1);
    assert_eq!(count(&body, "class=\"order-row\""), 0);
    assert!(body.contains("Failed to fetch orders"));
    assert!(body.contains("0–0 of 0"));
}

#[tokio::test]
async fn test_readiness_and_reload() {
    let app = TestApp::spawn(store_of(&["a", "b", "c"]), 2).await;

    let (status, body) = app.get("/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Loading orders..."));
    assert_eq!(app.get("/health/ready").await.0, StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .client
        .post(app.url("/orders/reload"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/orders"
    );

    app.wait_until_ready().await;
    let (_, body) = app.get("/orders").await;
    assert_eq!(count(&body, "class=\"order-row\""), 2);
    assert!(body.contains("1–2 of 3"));
}

#[tokio::test]
async fn test_bad_page_and_unknown_path() {
    let app = TestApp::spawn(store_of(&["a"]), 2).await;
    app.mount().await;

    assert_eq!(app.get("/orders?page=x").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/nope").await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/health").await, (StatusCode::OK, "ok".to_string()));
}

#[tokio::test]
async fn test_fixture_file_store() {
    let path = std::env::temp_dir().join(format!(
        "orderdesk-it-fixture-{}.json",
        std::process::id()
    ));
    let listing = json!({
        "documents": [
            order_json("f1", "Grace Hopper", &[("Mug", 8.0, 2)], 16.0),
            order_json("f2", "Alan Turing", &[], 0.0),
        ]
    });
    std::fs::write(&path, listing.to_string()).unwrap();

    let config = test_config(&[("ORDERS_FIXTURE_PATH", path.to_str().unwrap())]);
    let state = AppState::from_config(&config).unwrap();
    std::fs::remove_file(&path).unwrap();

    let app = TestApp::serve(state).await;
    app.mount().await;

    let (_, body) = app.get("/orders").await;
    assert_eq!(count(&body, "class=\"order-row\""), 2);
    assert!(body.contains("Grace Hopper"));
    assert!(body.contains("Mug (x2)"));
    assert!(body.contains("$0.00"));
}
