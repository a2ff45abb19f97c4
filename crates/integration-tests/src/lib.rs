//! Integration tests for Orderdesk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p orderdesk-integration-tests
//! ```
//!
//! No external services are needed: [`TestApp`] serves the real router on an
//! ephemeral port and [`firestore_mock::MockFirestore`] stands in for the
//! Firestore REST API.
//!
//! # Test Categories
//!
//! - `orders_view` - Orders table over an in-memory store
//! - `firestore_client` - REST client and app against the mock Firestore

#![allow(clippy::missing_panics_doc)]

pub mod firestore_mock;

use std::sync::Arc;
use std::time::Duration;

use orderdesk_admin::{
    config::OrderdeskConfig,
    routes,
    state::AppState,
    store::{Document, DocumentStore},
};
use reqwest::{Client, StatusCode, redirect::Policy};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// A running app bound to `127.0.0.1` on an ephemeral port.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
    server: JoinHandle<()>,
}

impl TestApp {
    /// Serve a view over `store` with the given page size. The view is not
    /// mounted yet.
    pub async fn spawn(store: Arc<dyn DocumentStore>, page_size: usize) -> Self {
        let page_size = page_size.to_string();
        let config = test_config(&[("ORDERS_PAGE_SIZE", page_size.as_str())]);
        Self::serve(AppState::new(&config.orders, store)).await
    }

    /// Serve the given state.
    pub async fn serve(state: AppState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = routes::routes().with_state(state.clone());

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::builder()
                .redirect(Policy::none())
                .build()
                .expect("Failed to create HTTP client"),
            state,
            server,
        }
    }

    /// Mount the view and wait for its read to settle.
    pub async fn mount(&self) {
        if let Some(load) = self.state.orders().mount().await {
            load.await.expect("Load task panicked");
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path, returning status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        let status = response.status();
        (status, response.text().await.expect("Body was not text"))
    }

    /// Poll `/health/ready` until it reports 200.
    pub async fn wait_until_ready(&self) {
        for _ in 0..200 {
            if self.get("/health/ready").await.0 == StatusCode::OK {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("orders view never settled");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Configuration from the given variables. Without `FIRESTORE_PROJECT_ID` a
/// placeholder fixture path keeps Firestore out of the picture.
#[must_use]
pub fn test_config(vars: &[(&str, &str)]) -> OrderdeskConfig {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let has_project = vars.iter().any(|(k, _)| k == "FIRESTORE_PROJECT_ID");

    OrderdeskConfig::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .or_else(|| {
                (key == "ORDERS_FIXTURE_PATH" && !has_project).then(|| "unused.json".to_string())
            })
    })
    .expect("Invalid test configuration")
}

/// Count occurrences of `needle` in `haystack`.
#[must_use]
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// One cart line: name, unit price, quantity.
pub type Line<'a> = (&'a str, f64, i64);

/// An order document in Firestore REST JSON.
#[must_use]
pub fn order_json(id: &str, customer: &str, lines: &[Line<'_>], total: f64) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .enumerate()
        .map(|(i, (name, price, quantity))| {
            json!({
                "mapValue": {
                    "fields": {
                        "id": {"stringValue": format!("{id}-{i}")},
                        "name": {"stringValue": name},
                        "price": {"doubleValue": price},
                        "quantity": {"integerValue": quantity.to_string()},
                    }
                }
            })
        })
        .collect();

    json!({
        "name": format!("projects/demo/databases/(default)/documents/orders/{id}"),
        "fields": {
            "customer": {
                "mapValue": {
                    "fields": {
                        "name": {"stringValue": customer},
                        "address": {"stringValue": "42 Harbor Rd"},
                        "phone": {"stringValue": "555-0123"},
                    }
                }
            },
            "createdAt": {"timestampValue": "2024-05-01T10:00:00Z"},
            "cartItems": {"arrayValue": {"values": items}},
            "totalPrice": {"doubleValue": total},
        },
        "createTime": "2024-05-01T10:00:00.000000Z",
        "updateTime": "2024-05-01T10:00:00.000000Z",
    })
}

/// An order document with a single line.
#[must_use]
pub fn simple_order(id: &str) -> Document {
    serde_json::from_value(order_json(id, &format!("Customer {id}"), &[("Pen", 2.5, 3)], 7.5))
        .expect("Fixture is a valid document")
}
