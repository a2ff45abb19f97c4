//! Orderdesk admin library.
//!
//! A read-only orders table: every order document of one Firestore
//! collection is read once when the view mounts, decoded into typed orders
//! and rendered server-side as a paginated table.
//!
//! This crate provides the functionality as a library so the binary and the
//! integration tests build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod view;
