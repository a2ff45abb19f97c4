//! Orders table route handlers.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::AppError,
    state::AppState,
    view::{OrdersIndexTemplate, Paginator},
};

/// Orders page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Zero-based page index; missing or empty means the first page.
    pub page: Option<String>,
}

impl OrdersQuery {
    /// Requested page index.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if `page` is not a non-negative integer.
    pub fn page(&self) -> Result<usize, AppError> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(0),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::BadRequest(format!("invalid page: {raw}"))),
        }
    }
}

/// Orders table page handler.
///
/// Renders whatever the view holds right now: the loading row until the
/// read settles, then the requested page of orders or the error row. Pages
/// past the end are clamped to the last page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersIndexTemplate, AppError> {
    let requested = query.page()?;
    let view = state.orders();
    let snapshot = view.snapshot().await;

    let mut paginator = Paginator::new(view.page_size());
    let page = paginator.set_page(requested, snapshot.orders().len());
    if page != requested {
        tracing::debug!(requested, page, "Requested page out of range");
    }

    Ok(OrdersIndexTemplate::build(&snapshot, &paginator))
}

/// Reload handler: remount the view, then show the first page.
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>) -> Redirect {
    let view = state.orders();
    if view.remount().await.is_some() {
        tracing::info!(collection = view.collection(), "Orders view remounted");
    }
    Redirect::to("/orders")
}
