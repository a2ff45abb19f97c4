//! Firestore REST API client.
//!
//! Lists a collection with `GET .../documents/{collection}`, following
//! `nextPageToken` until the listing is exhausted. Only reads are issued.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::config::FirestoreConfig;

use super::{Document, DocumentStore, ListDocumentsResponse, StoreError};

const PRODUCTION_BASE_URL: &str = "https://firestore.googleapis.com/v1";
/// Largest page the list endpoint serves.
const LIST_PAGE_SIZE: &str = "300";

/// Firestore REST API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    /// `.../v1/projects/{project}/databases/{database}/documents`
    documents_url: Url,
    access_token: Option<SecretString>,
    api_key: Option<SecretString>,
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl FirestoreClient {
    /// Create a new client for the configured project and database.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Url` if the emulator host or project produce an
    /// invalid URL.
    pub fn new(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let base = match &config.emulator_host {
            Some(host) => format!("http://{host}/v1"),
            None => PRODUCTION_BASE_URL.to_string(),
        };

        let mut documents_url = Url::parse(&base)?;
        documents_url
            .path_segments_mut()
            .map_err(|()| StoreError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend([
                "projects",
                config.project_id.as_str(),
                "databases",
                config.database.as_str(),
                "documents",
            ]);

        Ok(Self {
            inner: Arc::new(FirestoreClientInner {
                client: reqwest::Client::new(),
                documents_url,
                access_token: config.access_token.clone(),
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// URL of one page of a collection listing.
    fn list_url(&self, collection: &str, page_token: Option<&str>) -> Url {
        let mut url = self.inner.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection);
        }

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", LIST_PAGE_SIZE);
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
            if let Some(key) = &self.inner.api_key {
                query.append_pair("key", key.expose_secret());
            }
        }

        url
    }

    /// Fetch one page of a collection listing.
    async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError> {
        let mut request = self.inner.client.get(self.list_url(collection, page_token));
        if let Some(token) = &self.inner.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(StoreError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StoreError::PermissionDenied(message)
                }
                _ => StoreError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self))]
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0_u32;

        loop {
            let page = self.list_page(collection, page_token.as_deref()).await?;
            pages += 1;
            documents.extend(page.documents);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if !seen_tokens.insert(next.clone()) => {
                    return Err(StoreError::PageTokenCycle {
                        collection: collection.to_string(),
                        token: next,
                    });
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(pages, count = documents.len(), "Listed collection");
        Ok(documents)
    }
}
