//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Redirect to /orders
//! GET  /health           - Liveness check
//! GET  /health/ready     - 200 once the orders view has settled, 503 before
//!
//! # Orders (read from the document store)
//! GET  /orders?page=N    - Orders table, zero-based page N
//! POST /orders/reload    - Remount the view (fresh read), redirect to /orders
//! ```

pub mod health;
pub mod orders;

use axum::{
    Router,
    http::Uri,
    response::Redirect,
    routing::{get, post},
};

use crate::{error::AppError, state::AppState};

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/orders") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/orders", get(orders::index))
        .route("/orders/reload", post(orders::reload))
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::OrderdeskConfig;
    use crate::store::{Document, MemoryStore, Value};

    fn order_doc(id: &str) -> Document {
        let mut fields = BTreeMap::new();
        fields.insert(
            "customer".to_string(),
            Value::map([
                ("name", Value::string(format!("Customer {id}"))),
                ("address", Value::string("1 Main St")),
                ("phone", Value::string("555-0100")),
            ]),
        );
        fields.insert(
            "createdAt".to_string(),
            Value::TimestampValue("2024-05-01T10:00:00Z".to_string()),
        );
        fields.insert(
            "cartItems".to_string(),
            Value::array(vec![Value::map([
                ("id", Value::string(format!("{id}-pen"))),
                ("name", Value::string("Pen")),
                ("price", Value::DoubleValue(2.5)),
                ("quantity", Value::integer(3)),
            ])]),
        );
        fields.insert("totalPrice".to_string(), Value::DoubleValue(7.5));
        Document::new(format!("projects/p/databases/(default)/documents/orders/{id}"), fields)
    }

    fn app_state(ids: &[&str]) -> AppState {
        let config = OrderdeskConfig::from_lookup(|key| match key {
            "ORDERS_FIXTURE_PATH" => Some("unused.json".to_string()),
            "ORDERS_PAGE_SIZE" => Some("2".to_string()),
            _ => None,
        })
        .unwrap();
        let store = MemoryStore::new()
            .with_collection("orders", ids.iter().map(|id| order_doc(id)).collect());
        AppState::new(&config.orders, Arc::new(store))
    }

    async fn mounted(ids: &[&str]) -> AppState {
        let state = app_state(ids);
        state.orders().mount().await.unwrap().await.unwrap();
        state
    }

    async fn send(state: &AppState, method: &str, uri: &str) -> (StatusCode, String) {
        let response = routes()
            .with_state(state.clone())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        (status, location.unwrap_or(body))
    }

    #[tokio::test]
    async fn test_root_redirects_to_orders() {
        let (status, location) = send(&app_state(&[]), "GET", "/").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/orders");
    }

    #[tokio::test]
    async fn test_unmounted_view_shows_loading_row() {
        let (status, body) = send(&app_state(&["a"]), "GET", "/orders").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Loading orders..."));
        assert!(!body.contains("class=\"order-row\""));
    }

    #[tokio::test]
    async fn test_orders_page_renders_rows() {
        let state = mounted(&["a", "b", "c"]).await;

        let (status, body) = send(&state, "GET", "/orders").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches("class=\"order-row\"").count(), 2);
        assert!(body.contains("Pen (x3)"));
        assert!(body.contains("$7.50"));
        assert!(body.contains("1–2 of 3"));

        let (_, body) = send(&state, "GET", "/orders?page=1").await;
        assert_eq!(body.matches("class=\"order-row\"").count(), 1);
        assert!(body.contains("data-order-id=\"c\""));
    }

    #[tokio::test]
    async fn test_page_past_end_is_clamped() {
        let state = mounted(&["a", "b", "c"]).await;
        let (status, body) = send(&state, "GET", "/orders?page=9").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("3–3 of 3"));
    }

    #[tokio::test]
    async fn test_invalid_page_is_bad_request() {
        let state = mounted(&["a"]).await;
        let (status, _) = send(&state, "GET", "/orders?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, body) = send(&app_state(&[]), "GET", "/orders/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("/orders/abc"));
    }

    #[tokio::test]
    async fn test_readiness_follows_view_state() {
        let state = app_state(&["a"]);
        let (status, _) = send(&state, "GET", "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        state.orders().mount().await.unwrap().await.unwrap();
        let (status, _) = send(&state, "GET", "/health/ready").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&state, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_reload_remounts_view() {
        let state = app_state(&["a", "b"]);

        let (status, location) = send(&state, "POST", "/orders/reload").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/orders");

        for _ in 0..100 {
            if state.orders().snapshot().await.is_settled() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state.orders().snapshot().await.orders().len(), 2);
    }
}
