//! Pagination state and utilities

use serde::{Deserialize, Serialize};

use crate::core::error::TableError;

/// Page sizes offered by the inventory table
pub const STANDARD_PAGE_SIZES: [usize; 4] = [25, 50, 75, 100];

/// Page sizes offered by the compact table variant
pub const COMPACT_PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

/// The set of page sizes a table accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizeOptions(Vec<usize>);

impl PageSizeOptions {
    /// Build a custom option set; zero sizes are dropped
    pub fn new(sizes: impl IntoIterator<Item = usize>) -> Self {
        let mut sizes: Vec<usize> = sizes.into_iter().filter(|s| *s > 0).collect();
        sizes.sort_unstable();
        sizes.dedup();
        Self(sizes)
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_PAGE_SIZES)
    }

    pub fn compact() -> Self {
        Self::new(COMPACT_PAGE_SIZES)
    }

    pub fn contains(&self, size: usize) -> bool {
        self.0.contains(&size)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Smallest allowed size, used as the default
    pub fn first(&self) -> usize {
        self.0.first().copied().unwrap_or(STANDARD_PAGE_SIZES[0])
    }

    pub(crate) fn check(&self, size: usize) -> Result<(), TableError> {
        if self.contains(size) {
            Ok(())
        } else {
            Err(TableError::InvalidPageSize {
                size,
                allowed: self.0.clone(),
            })
        }
    }
}

impl Default for PageSizeOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pagination state of one table
///
/// `page_index` starts at 0. It is kept inside
/// `[0, page_count(total) - 1]` by the table engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages for `total` rows, never less than 1
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.max(1)).max(1)
    }

    /// Clamp the page index into range for `total` rows
    ///
    /// Returns true when the index moved.
    pub fn clamp(&mut self, total: usize) -> bool {
        let last = self.page_count(total) - 1;
        if self.page_index > last {
            self.page_index = last;
            true
        } else {
            false
        }
    }

    /// Half-open row range `[start, end)` of the current page
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(STANDARD_PAGE_SIZES[0])
    }
}

/// Pagination metadata for one rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page index (starts at 0)
    pub page_index: usize,

    /// Number of rows per page
    pub page_size: usize,

    /// Total number of rows after filters
    pub total: usize,

    /// Total number of pages (at least 1)
    pub page_count: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(state: &PaginationState, total: usize) -> Self {
        let page_count = state.page_count(total);

        Self {
            page_index: state.page_index,
            page_size: state.page_size,
            total,
            page_count,
            has_next: state.page_index + 1 < page_count,
            has_prev: state.page_index > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let state = PaginationState::default();
        assert_eq!(state.page_index, 0);
        assert_eq!(state.page_size, 25);
    }

    #[test]
    fn test_page_count_minimum_one() {
        let state = PaginationState::new(25);
        assert_eq!(state.page_count(0), 1);
        assert_eq!(state.page_count(25), 1);
        assert_eq!(state.page_count(26), 2);
        assert_eq!(state.page_count(120), 5);
    }

    #[test]
    fn test_clamp_moves_index_down() {
        let mut state = PaginationState {
            page_index: 4,
            page_size: 25,
        };
        assert!(state.clamp(30));
        assert_eq!(state.page_index, 1);
        assert!(!state.clamp(30));
    }

    #[test]
    fn test_range_of_last_partial_page() {
        let state = PaginationState {
            page_index: 1,
            page_size: 25,
        };
        assert_eq!(state.range(30), 25..30);
    }

    #[test]
    fn test_pagination_meta() {
        let state = PaginationState {
            page_index: 0,
            page_size: 20,
        };
        let meta = PaginationMeta::new(&state, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.page_count, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_page_size_options() {
        let options = PageSizeOptions::compact();
        assert!(options.contains(30));
        assert!(!options.contains(25));
        assert_eq!(options.first(), 10);
        assert!(options.check(25).is_err());
        assert_eq!(PageSizeOptions::new([50, 0, 25, 50]).as_slice(), &[25, 50]);
    }
}
