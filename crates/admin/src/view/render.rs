//! Projection of the view state onto the orders table template.

use askama::Template;
use askama_web::WebTemplate;
use orderdesk_core::Order;

use crate::components::data_table::{TableColumn, orders_table_config};

use super::{Paginator, ViewState};

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRowView {
    pub id: String,
    pub customer_name: String,
    pub address: String,
    pub phone: String,
    pub created_at: String,
    /// One `name (xN)` line per cart item.
    pub items: Vec<String>,
    /// e.g. `$12.50`
    pub total: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.customer.name.clone(),
            address: order.customer.address.clone(),
            phone: order.customer.phone.clone(),
            created_at: order.created_at.clone(),
            items: order.cart_items.iter().map(|item| item.display_line()).collect(),
            total: order.total_price.display(),
        }
    }
}

/// State of the pagination control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// Total number of orders.
    pub count: usize,
    pub page_size: usize,
    /// Zero-based.
    pub page: usize,
    pub page_count: usize,
    /// e.g. `3–4 of 5`
    pub range_label: String,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
    pub page_size_options: Vec<usize>,
}

impl PaginationView {
    #[must_use]
    pub fn new(paginator: &Paginator, count: usize) -> Self {
        let window = paginator.current_window(count);
        let page = paginator.page();
        let page_count = paginator.page_count(count);
        let from = if window.is_empty() { 0 } else { window.start + 1 };

        Self {
            count,
            page_size: paginator.page_size().rows(count),
            page,
            page_count,
            range_label: format!("{from}–{} of {count}", window.end),
            prev_page: page.checked_sub(1),
            next_page: (page + 1 < page_count).then_some(page + 1),
            page_size_options: paginator.page_size_options(),
        }
    }
}

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    /// Data table ID.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// `colspan` of the status rows.
    pub full_width: usize,
    pub loading_text: String,
    pub empty_title: String,
    /// Read still in flight (or view not mounted).
    pub loading: bool,
    /// When set, the only row rendered.
    pub error: Option<String>,
    /// Rows of the current page; empty when `error` is set.
    pub rows: Vec<OrderRowView>,
    /// Absent when pagination is disabled.
    pub pagination: Option<PaginationView>,
}

impl OrdersIndexTemplate {
    /// Build the page for the given state and page selection.
    #[must_use]
    pub fn build(state: &ViewState, paginator: &Paginator) -> Self {
        let config = orders_table_config();
        let orders = state.orders();
        let error = state.error().map(ToString::to_string);

        let rows = if error.is_some() {
            vec![]
        } else {
            paginator
                .page_of(orders)
                .iter()
                .map(OrderRowView::from)
                .collect()
        };

        let pagination = paginator
            .page_size()
            .is_paginated()
            .then(|| PaginationView::new(paginator, orders.len()));

        Self {
            table_id: config.table_id.clone(),
            full_width: config.full_width(),
            columns: config.columns,
            loading_text: config.loading_text,
            empty_title: config.empty_title,
            loading: matches!(state, ViewState::Loading | ViewState::Unmounted),
            error,
            rows,
            pagination,
        }
    }

    /// Loaded with nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.rows.is_empty()
    }
}
