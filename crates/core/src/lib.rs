//! Orderdesk Core - Shared types library.
//!
//! This crate provides the order types used by the `admin` crate:
//! orders, their customer details, cart snapshots, and prices.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no document store access,
//! no HTTP clients. Decoding from the store lives with the store client.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and the order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
