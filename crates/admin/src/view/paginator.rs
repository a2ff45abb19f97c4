//! Client-side pagination over the in-memory order list.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Rows shown per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// Pagination disabled: every row on a single page.
    All,
    /// A fixed number of rows per page.
    Fixed(NonZeroUsize),
}

impl PageSize {
    /// Map a configured size to a page size; `0` disables pagination.
    #[must_use]
    pub fn from_config(size: usize) -> Self {
        NonZeroUsize::new(size).map_or(Self::All, Self::Fixed)
    }

    /// Rows per page for a list of `total` rows.
    #[must_use]
    pub const fn rows(self, total: usize) -> usize {
        match self {
            Self::All => total,
            Self::Fixed(size) => size.get(),
        }
    }

    #[must_use]
    pub const fn is_paginated(self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

/// Current page of a list with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: PageSize,
}

impl Paginator {
    /// Start at page 0.
    #[must_use]
    pub const fn new(page_size: PageSize) -> Self {
        Self { page: 0, page_size }
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// The only page size offered to the pagination control.
    #[must_use]
    pub fn page_size_options(&self) -> Vec<usize> {
        match self.page_size {
            PageSize::All => vec![],
            PageSize::Fixed(size) => vec![size.get()],
        }
    }

    /// Number of pages for `total` rows; an empty list still has one page.
    #[must_use]
    pub fn page_count(&self, total: usize) -> usize {
        match self.page_size {
            PageSize::All => 1,
            PageSize::Fixed(size) => total.div_ceil(size.get()).max(1),
        }
    }

    /// Select a page, clamped to `[0, page_count - 1]`. Returns the page
    /// actually selected.
    pub fn set_page(&mut self, page: usize, total: usize) -> usize {
        self.page = page.min(self.page_count(total) - 1);
        self.page
    }

    /// Row range of `page` for `total` rows, without clamping: pages past
    /// the end are empty, the last page may be short.
    #[must_use]
    pub fn window(page: usize, page_size: usize, total: usize) -> Range<usize> {
        let start = page.saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        start..end
    }

    /// Row range of the current page.
    #[must_use]
    pub fn current_window(&self, total: usize) -> Range<usize> {
        Self::window(self.page, self.page_size.rows(total), total)
    }

    /// Rows of the current page.
    #[must_use]
    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.current_window(items.len())).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(size: usize) -> PageSize {
        PageSize::from_config(size)
    }

    #[test]
    fn test_window_row_count_matches_formula() {
        for page_size in 1_usize..=5 {
            for total in 0_usize..=12 {
                for page in 0_usize..=14 {
                    let expected = page_size.min(total.saturating_sub(page * page_size));
                    assert_eq!(
                        Paginator::window(page, page_size, total).len(),
                        expected,
                        "page_size={page_size} total={total} page={page}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_page_of_slices_contiguously() {
        let rows = ["a", "b", "c", "d", "e"];
        let mut paginator = Paginator::new(fixed(2));

        assert_eq!(paginator.page_of(&rows), &["a", "b"]);
        paginator.set_page(1, rows.len());
        assert_eq!(paginator.page_of(&rows), &["c", "d"]);
        paginator.set_page(2, rows.len());
        assert_eq!(paginator.page_of(&rows), &["e"]);
    }

    #[test]
    fn test_set_page_clamps_past_end() {
        let mut paginator = Paginator::new(fixed(2));
        assert_eq!(paginator.set_page(9, 5), 2);
        assert_eq!(paginator.page(), 2);
        assert_eq!(paginator.set_page(3, 0), 0);
    }

    #[test]
    fn test_page_count() {
        let paginator = Paginator::new(fixed(2));
        assert_eq!(paginator.page_count(0), 1);
        assert_eq!(paginator.page_count(4), 2);
        assert_eq!(paginator.page_count(5), 3);
        assert_eq!(Paginator::new(PageSize::All).page_count(50), 1);
    }

    #[test]
    fn test_unpaginated_shows_everything() {
        let rows = [1, 2, 3];
        let mut paginator = Paginator::new(PageSize::All);
        assert_eq!(paginator.set_page(4, rows.len()), 0);
        assert_eq!(paginator.page_of(&rows), &[1, 2, 3]);
        assert!(paginator.page_size_options().is_empty());
    }

    #[test]
    fn test_single_page_size_option() {
        assert_eq!(Paginator::new(fixed(2)).page_size_options(), vec![2]);
        assert!(fixed(2).is_paginated());
        assert!(!fixed(0).is_paginated());
    }

    #[test]
    fn test_empty_list_has_empty_page() {
        let rows: [u8; 0] = [];
        assert!(Paginator::new(fixed(2)).page_of(&rows).is_empty());
    }
}
