//! Orders view lifecycle: mount, load once, expose the result.
//!
//! ```text
//! mount() ──> Loading ──ok──> Loaded(orders)
//!                    └─err──> Errored("Failed to fetch orders")
//! unmount() / remount() bump the generation; a load that finishes for an
//! older generation is dropped.
//! ```

use std::fmt::Display;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use orderdesk_core::Order;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::instrument;

use crate::store::{DecodeError, DocumentStore, StoreError, decode_order};

use super::PageSize;

/// The message shown in place of the table when loading fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch orders";

/// Why a load failed. Collapsed to [`LOAD_FAILED_MESSAGE`] for display.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("store read failed: {0}")]
    Store(#[from] StoreError),

    #[error("malformed order document: {0}")]
    Decode(#[from] DecodeError),
}

/// What the view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Not mounted; nothing has been requested.
    Unmounted,
    /// Mounted, read in flight.
    Loading,
    /// Read succeeded.
    Loaded(Arc<Vec<Order>>),
    /// Read failed; holds the user-facing message.
    Errored(String),
}

impl ViewState {
    /// Orders available for display; empty unless loaded.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        match self {
            Self::Loaded(orders) => orders,
            _ => &[],
        }
    }

    /// User-facing error message, if the load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Errored(message) => Some(message),
            _ => None,
        }
    }

    /// Loaded or errored.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Errored(_))
    }
}

/// Read every document of `collection` and decode each into an [`Order`].
///
/// All-or-nothing: the first malformed document fails the whole load.
///
/// # Errors
///
/// Returns `LoadError::Store` if the read fails and `LoadError::Decode` if
/// any document does not match the order schema.
pub async fn load_orders<Tz>(
    store: &dyn DocumentStore,
    collection: &str,
    tz: &Tz,
) -> Result<Vec<Order>, LoadError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let documents = store.list_documents(collection).await?;
    let orders = documents
        .iter()
        .map(|doc| decode_order(doc, tz))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(orders)
}

/// The orders table view: owns the loaded orders and their lifecycle.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct OrdersView {
    inner: Arc<OrdersViewInner>,
}

struct OrdersViewInner {
    store: Arc<dyn DocumentStore>,
    collection: String,
    page_size: PageSize,
    state: RwLock<Mount>,
}

struct Mount {
    /// Incremented on every mount and unmount.
    generation: u64,
    mounted: bool,
    state: ViewState,
    /// The in-flight load of the current generation, if any.
    load: Option<AbortHandle>,
}

impl OrdersView {
    /// Create an unmounted view reading `collection` from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: &str, page_size: PageSize) -> Self {
        Self {
            inner: Arc::new(OrdersViewInner {
                store,
                collection: collection.to_string(),
                page_size,
                state: RwLock::new(Mount {
                    generation: 0,
                    mounted: false,
                    state: ViewState::Unmounted,
                    load: None,
                }),
            }),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.inner.collection
    }

    #[must_use]
    pub fn page_size(&self) -> PageSize {
        self.inner.page_size
    }

    /// Mount the view and start its single read.
    ///
    /// Returns the load task, or `None` if the view was already mounted.
    #[instrument(skip(self), fields(collection = %self.inner.collection))]
    pub async fn mount(&self) -> Option<JoinHandle<()>> {
        let mut mount = self.inner.state.write().await;
        if mount.mounted {
            tracing::debug!("Orders view already mounted");
            return None;
        }
        mount.generation += 1;
        mount.mounted = true;
        mount.state = ViewState::Loading;
        let generation = mount.generation;

        let view = self.clone();
        let task = tokio::spawn(async move {
            let store = view.inner.store.as_ref();
            let result = load_orders(store, &view.inner.collection, &Local).await;
            view.apply(generation, result).await;
        });
        mount.load = Some(task.abort_handle());
        Some(task)
    }

    /// Tear the view down and cancel any read still in flight.
    #[instrument(skip(self), fields(collection = %self.inner.collection))]
    pub async fn unmount(&self) {
        let mut mount = self.inner.state.write().await;
        mount.generation += 1;
        mount.mounted = false;
        mount.state = ViewState::Unmounted;
        if let Some(load) = mount.load.take() {
            load.abort();
        }
    }

    /// Unmount and mount again; the only way to refresh the orders.
    pub async fn remount(&self) -> Option<JoinHandle<()>> {
        self.unmount().await;
        self.mount().await
    }

    /// Current state. Orders are shared, not copied.
    pub async fn snapshot(&self) -> ViewState {
        self.inner.state.read().await.state.clone()
    }

    async fn apply(&self, generation: u64, result: Result<Vec<Order>, LoadError>) {
        let mut mount = self.inner.state.write().await;
        if !mount.mounted || mount.generation != generation {
            tracing::debug!(
                generation,
                current = mount.generation,
                "Discarding orders load for a stale mount"
            );
            return;
        }

        mount.load = None;
        mount.state = match result {
            Ok(orders) => {
                tracing::info!(count = orders.len(), "Orders loaded");
                ViewState::Loaded(Arc::new(orders))
            }
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                tracing::error!(
                    error = %e,
                    sentry_event_id = %event_id,
                    "Failed to fetch orders"
                );
                ViewState::Errored(LOAD_FAILED_MESSAGE.to_string())
            }
        };
    }
}
