//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{OrderdeskConfig, OrdersConfig, StoreConfig};
use crate::store::{DocumentStore, FirestoreClient, MemoryStore, StoreError};
use crate::view::OrdersView;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    orders: OrdersView,
}

impl AppState {
    /// Create state over an explicit store. The orders view starts unmounted.
    #[must_use]
    pub fn new(orders: &OrdersConfig, store: Arc<dyn DocumentStore>) -> Self {
        let orders = OrdersView::new(store, &orders.collection, orders.page_size);
        Self {
            inner: Arc::new(AppStateInner { orders }),
        }
    }

    /// Create state with the store selected by configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Firestore client cannot be built or the
    /// fixture file cannot be loaded.
    pub fn from_config(config: &OrderdeskConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn DocumentStore> = match &config.store {
            StoreConfig::Firestore(firestore) => {
                tracing::info!(
                    project_id = %firestore.project_id,
                    database = %firestore.database,
                    emulator = firestore.emulator_host.is_some(),
                    "Using Firestore document store"
                );
                Arc::new(FirestoreClient::new(firestore)?)
            }
            StoreConfig::Fixture(path) => {
                Arc::new(MemoryStore::from_fixture(&config.orders.collection, path)?)
            }
        };
        Ok(Self::new(&config.orders, store))
    }

    #[must_use]
    pub fn orders(&self) -> &OrdersView {
        &self.inner.orders
    }
}
