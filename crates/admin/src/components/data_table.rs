//! Data table component types.
//!
//! These types define the column layout shared by the table header and the
//! full-width status rows (loading, error).

use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Right-align cell contents (amounts).
    pub numeric: bool,
}

impl TableColumn {
    /// Create a new text column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
        }
    }

    /// Mark the column as numeric.
    #[must_use]
    pub const fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions, in display order.
    pub columns: Vec<TableColumn>,
    /// Text of the row shown while data is loading.
    pub loading_text: String,
    /// Text shown when there are no rows.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            loading_text: "Loading...".to_string(),
            empty_title: "No items found".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the loading row text.
    #[must_use]
    pub fn loading_text(mut self, text: &str) -> Self {
        self.loading_text = text.to_string();
        self
    }

    /// Set the empty state title.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Span of a row that covers every column.
    #[must_use]
    pub fn full_width(&self) -> usize {
        self.columns.len()
    }
}

/// Build the orders table configuration.
#[must_use]
pub fn orders_table_config() -> DataTableConfig {
    DataTableConfig::new("orders")
        .column(TableColumn::new("id", "Order ID"))
        .column(TableColumn::new("customer", "Customer Name"))
        .column(TableColumn::new("address", "Address"))
        .column(TableColumn::new("phone", "Phone"))
        .column(TableColumn::new("created", "Order Date"))
        .column(TableColumn::new("items", "Items"))
        .column(TableColumn::new("total", "Total Price").numeric())
        .loading_text("Loading orders...")
        .empty_state("No orders found")
}
