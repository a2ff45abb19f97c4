//! A stand-in for the Firestore REST `documents.list` endpoint.
//!
//! Serves fixed pages and hands out `nextPageToken`s the way the real API
//! does. Collections can be marked denied (403), busy (429) or cycling
//! (page tokens `a`, `b`, `a`, ...).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Seconds sent in `Retry-After` for busy collections.
pub const RETRY_AFTER_SECS: u64 = 7;

/// One request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub project: String,
    pub database: String,
    pub collection: String,
    pub page_token: Option<String>,
    pub authorization: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    collections: HashMap<String, Vec<Value>>,
    denied: HashSet<String>,
    busy: HashSet<String>,
    cycling: HashSet<String>,
    requests: Vec<RecordedRequest>,
}

/// Mock Firestore server. Clones share state.
#[derive(Debug, Clone)]
pub struct MockFirestore {
    page_size: usize,
    state: Arc<Mutex<MockState>>,
}

impl MockFirestore {
    /// Serve at most `page_size` documents per page.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            state: Arc::default(),
        }
    }

    /// Add a collection of documents in REST JSON form.
    #[must_use]
    pub fn with_collection(self, name: &str, documents: Vec<Value>) -> Self {
        self.lock().collections.insert(name.to_string(), documents);
        self
    }

    /// Answer 403 for this collection.
    #[must_use]
    pub fn deny(self, name: &str) -> Self {
        self.lock().denied.insert(name.to_string());
        self
    }

    /// Answer 429 for this collection.
    #[must_use]
    pub fn busy(self, name: &str) -> Self {
        self.lock().busy.insert(name.to_string());
        self
    }

    /// Alternate between page tokens `a` and `b` forever.
    #[must_use]
    pub fn cycle(self, name: &str) -> Self {
        self.lock().cycling.insert(name.to_string());
        self
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Start serving on an ephemeral port; returns `host:port`.
    pub async fn start(&self) -> (String, JoinHandle<()>) {
        let app = Router::new()
            .route(
                "/v1/projects/{project}/databases/{database}/documents/{collection}",
                get(list_documents),
            )
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Firestore");
        let addr = listener.local_addr().expect("Listener has no address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock Firestore error");
        });

        (addr.to_string(), server)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("Mock state poisoned")
    }
}

fn google_error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
                "status": code,
            }
        })),
    )
        .into_response()
}

async fn list_documents(
    State(mock): State<MockFirestore>,
    Path((project, database, collection)): Path<(String, String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut state = mock.lock();
    state.requests.push(RecordedRequest {
        project,
        database,
        collection: collection.clone(),
        page_token: params.get("pageToken").cloned(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        key: params.get("key").cloned(),
    });

    if state.denied.contains(&collection) {
        return google_error(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED",
            "Missing or insufficient permissions.",
        );
    }
    if state.busy.contains(&collection) {
        let mut response =
            google_error(StatusCode::TOO_MANY_REQUESTS, "RESOURCE_EXHAUSTED", "Quota exceeded.");
        response.headers_mut().insert(
            header::RETRY_AFTER,
            header::HeaderValue::from(RETRY_AFTER_SECS),
        );
        return response;
    }

    if state.cycling.contains(&collection) {
        let next = match params.get("pageToken").map(String::as_str) {
            Some("a") => "b",
            _ => "a",
        };
        return Json(json!({ "nextPageToken": next })).into_response();
    }

    let Some(start) = params
        .get("pageToken")
        .map_or(Some(0), |token| token.parse::<usize>().ok())
    else {
        return google_error(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", "Invalid page token.");
    };

    let documents = state.collections.get(&collection).cloned().unwrap_or_default();
    let end = start.saturating_add(mock.page_size).min(documents.len());
    let page: Vec<Value> = documents
        .get(start.min(end)..end)
        .map(<[Value]>::to_vec)
        .unwrap_or_default();

    // The real API omits both keys when there is nothing to return.
    let mut body = serde_json::Map::new();
    if !page.is_empty() {
        body.insert("documents".to_string(), Value::Array(page));
    }
    if end < documents.len() {
        body.insert("nextPageToken".to_string(), Value::String(end.to_string()));
    }

    Json(Value::Object(body)).into_response()
}
