//! Order records as displayed in the orders table.

use serde::{Deserialize, Serialize};

use super::{CartItemId, OrderId, Price};

/// A customer purchase record.
///
/// `created_at` is already formatted for display; it is produced once when
/// the order is loaded and never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub created_at: String,
    pub cart_items: Vec<CartItem>,
    /// Not reconciled against `cart_items`.
    pub total_price: Price,
}

/// Customer details captured on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// One line item of an order's cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Display line for the items column, e.g. `Pen (x3)`.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("{} (x{})", self.name, self.quantity)
    }
}
