//! Core types for Orderdesk.
//!
//! This module provides type-safe wrappers for the order domain.

pub mod id;
pub mod order;
pub mod price;

pub use id::*;
pub use order::{CartItem, Customer, Order};
pub use price::{CurrencyCode, Price};
