//! Document store access (read-only).
//!
//! # Architecture
//!
//! - [`DocumentStore`] is the seam the orders view depends on; the view never
//!   reaches for a global client.
//! - [`FirestoreClient`] reads a collection through the Firestore REST API,
//!   following `nextPageToken` until the whole collection has been listed.
//! - [`MemoryStore`] serves documents held in memory, optionally loaded from
//!   a JSON fixture in the same format the REST API returns.
//! - [`decode`] validates documents into typed orders.
//!
//! # Example
//!
//! ```rust,ignore
//! use orderdesk_admin::store::{DocumentStore, FirestoreClient};
//!
//! let client = FirestoreClient::new(&firestore_config)?;
//! let documents = client.list_documents("orders").await?;
//! ```

pub mod decode;
mod document;
mod firestore;
mod memory;

pub use decode::{DecodeError, decode_order};
pub use document::{ArrayValue, Document, GeoPoint, ListDocumentsResponse, MapValue, Value};
pub use firestore::FirestoreClient;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading from a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Caller is not allowed to read the collection.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limited by the store.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Listing handed back a page token it had already issued.
    #[error("Page token {token} repeated while listing {collection}")]
    PageTokenCycle { collection: String, token: String },

    /// Store endpoint could not be built from configuration.
    #[error("Invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    /// Fixture file could not be read.
    #[error("Fixture error: {0}")]
    Fixture(#[from] std::io::Error),
}

/// Read access to a schemaless document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in the named top-level collection.
    ///
    /// A missing collection is an empty collection.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
}
