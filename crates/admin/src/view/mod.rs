//! The orders table view.
//!
//! - [`loader`] owns the mount lifecycle and the single store read.
//! - [`paginator`] selects the rows of the current page.
//! - [`render`] projects both onto the page template.

pub mod loader;
pub mod paginator;
pub mod render;

pub use loader::{LOAD_FAILED_MESSAGE, LoadError, OrdersView, ViewState, load_orders};
pub use paginator::{PageSize, Paginator};
pub use render::{OrderRowView, OrdersIndexTemplate, PaginationView};
