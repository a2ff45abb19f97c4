//! In-memory document store.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use super::{Document, DocumentStore, ListDocumentsResponse, StoreError};

/// Documents held in memory, keyed by collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a collection.
    #[must_use]
    pub fn with_collection(mut self, collection: &str, documents: Vec<Document>) -> Self {
        self.collections.insert(collection.to_string(), documents);
        self
    }

    /// Load a collection from a JSON fixture in the list-documents format
    /// (`{"documents": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Fixture` if the file cannot be read and
    /// `StoreError::Parse` if it is not a valid listing.
    pub fn from_fixture(collection: &str, path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let listing: ListDocumentsResponse = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            count = listing.documents.len(),
            "Loaded fixture documents"
        );
        Ok(Self::new().with_collection(collection, listing.documents))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}
