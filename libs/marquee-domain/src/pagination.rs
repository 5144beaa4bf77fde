//! Page windows over collections
//!
//! The [`Paginator`] exposes exactly one page of a re-iterable source. It is
//! used by the in-memory adapter to slice search results. [`PageInfo`] is the
//! page metadata the API layer reports next to the results.

use thiserror::Error;

use crate::search::PageRequest;

/// Errors raised when paginator parameters are out of range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Total item count cannot be negative
    #[error("Total items must be greater than or equal to 0, got {0}")]
    NegativeTotal(i64),

    /// Pages are 1-based
    #[error("Current page must be a positive integer, got {0}")]
    InvalidPage(i64),

    /// A page holds at least one item
    #[error("Items per page must be a positive integer, got {0}")]
    InvalidItemsPerPage(i64),
}

/// A window `[offset, offset + limit)` over a source collection
///
/// The source must be cheaply re-iterable (`&Vec<T>`, a slice, a range...):
/// every call to [`Paginator::iter`] starts a fresh forward-only view.
///
/// # Example
///
/// ```rust
/// use marquee_domain::pagination::Paginator;
///
/// let items: Vec<u32> = (1..=25).collect();
/// let page = Paginator::new(&items, 25, 3, 10).unwrap();
///
/// assert_eq!(page.last_page(), 3);
/// assert_eq!(page.iter().copied().collect::<Vec<_>>(), vec![21, 22, 23, 24, 25]);
/// ```
#[derive(Debug, Clone)]
pub struct Paginator<I> {
    items: I,
    total_items: u64,
    current_page: u64,
    items_per_page: u64,
    offset: u64,
    last_page: u64,
}

impl<I> Paginator<I>
where
    I: IntoIterator + Clone,
{
    /// Build a paginator, validating the page parameters
    ///
    /// # Errors
    ///
    /// - `PaginationError::NegativeTotal` if `total_items < 0`
    /// - `PaginationError::InvalidPage` if `current_page < 1`
    /// - `PaginationError::InvalidItemsPerPage` if `items_per_page < 1`
    pub fn new(
        items: I,
        total_items: i64,
        current_page: i64,
        items_per_page: i64,
    ) -> Result<Self, PaginationError> {
        if total_items < 0 {
            return Err(PaginationError::NegativeTotal(total_items));
        }
        if current_page < 1 {
            return Err(PaginationError::InvalidPage(current_page));
        }
        if items_per_page < 1 {
            return Err(PaginationError::InvalidItemsPerPage(items_per_page));
        }

        let total_items = total_items as u64;
        let current_page = current_page as u64;
        let items_per_page = items_per_page as u64;

        Ok(Self {
            items,
            total_items,
            current_page,
            items_per_page,
            // An offset past u64 lies past any source
            offset: (current_page - 1)
                .checked_mul(items_per_page)
                .unwrap_or(u64::MAX),
            last_page: total_items.div_ceil(items_per_page).max(1),
        })
    }

    pub fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// `max(1, ceil(total_items / items_per_page))`
    pub fn last_page(&self) -> u64 {
        self.last_page
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of items in the current window
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Iterate over the current page
    ///
    /// Yields nothing when the current page lies past the last page.
    pub fn iter(&self) -> impl Iterator<Item = I::Item> {
        let limit = if self.current_page > self.last_page {
            0
        } else {
            usize::try_from(self.items_per_page).unwrap_or(usize::MAX)
        };

        self.items
            .clone()
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(limit)
    }
}

/// Page metadata reported alongside search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u64,
    pub items_per_page: u64,
    pub last_page: u64,
    pub total_items: u64,
}

impl PageInfo {
    /// Metadata for a page served straight from storage
    pub fn for_request(total_items: u64, page: &PageRequest) -> Self {
        let items_per_page = page.per_page() as u64;
        Self {
            current_page: page.page() as u64,
            items_per_page,
            last_page: total_items.div_ceil(items_per_page).max(1),
            total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(n: u32) -> Vec<u32> {
        (0..n).collect()
    }

    #[test]
    fn test_full_and_partial_pages() {
        let items = source(12);

        let first = Paginator::new(&items, 12, 1, 5).unwrap();
        assert_eq!(first.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

        let last = Paginator::new(&items, 12, 3, 5).unwrap();
        assert_eq!(last.count(), 2);
        assert_eq!(last.iter().copied().collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(last.last_page(), 3);
    }

    #[test]
    fn test_window_size_matches_remaining_items() {
        for total in 0..20u32 {
            let items = source(total);
            for per_page in 1..6i64 {
                let pages = (total as i64 + per_page - 1) / per_page;
                for page in 1..=pages.max(1) {
                    let paginator = Paginator::new(&items, total as i64, page, per_page).unwrap();
                    let offset = (page - 1) * per_page;
                    let expected = per_page.min(total as i64 - offset).max(0) as usize;

                    assert_eq!(paginator.count(), expected);
                    assert_eq!(paginator.iter().next().copied(), items.get(offset as usize).copied());
                }
            }
        }
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let items = source(5);
        let paginator = Paginator::new(&items, 5, 2, 5).unwrap();

        assert_eq!(paginator.last_page(), 1);
        assert_eq!(paginator.count(), 0);
        assert!(paginator.iter().next().is_none());
    }

    #[test]
    fn test_last_page_is_at_least_one() {
        let items: Vec<u32> = Vec::new();
        let paginator = Paginator::new(&items, 0, 1, 10).unwrap();

        assert_eq!(paginator.last_page(), 1);
        assert_eq!(paginator.count(), 0);
    }

    #[test]
    fn test_page_info_for_request_matches_paginator() {
        let items = source(23);
        let page = PageRequest::new(2, 10).unwrap();
        let paginator = Paginator::new(&items, 23, 2, 10).unwrap();

        let info = PageInfo::for_request(23, &page);

        assert_eq!(info.current_page, paginator.current_page());
        assert_eq!(info.items_per_page, paginator.items_per_page());
        assert_eq!(info.last_page, paginator.last_page());
        assert_eq!(info.total_items, paginator.total_items());
    }

    #[test]
    fn test_huge_page_numbers_do_not_overflow() {
        let items = source(3);
        let paginator = Paginator::new(&items, 3, i64::MAX, i64::MAX).unwrap();

        assert_eq!(paginator.last_page(), 1);
        assert_eq!(paginator.count(), 0);

        let paginator = Paginator::new(&items, 3, u32::MAX as i64, u32::MAX as i64).unwrap();
        assert!(paginator.iter().next().is_none());
    }

    #[test]
    fn test_iter_restarts_on_each_call() {
        let items = source(3);
        let paginator = Paginator::new(&items, 3, 1, 2).unwrap();

        assert_eq!(paginator.iter().count(), 2);
        assert_eq!(paginator.iter().count(), 2);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let items = source(3);

        assert_eq!(
            Paginator::new(&items, -1, 1, 10).unwrap_err(),
            PaginationError::NegativeTotal(-1)
        );
        assert_eq!(
            Paginator::new(&items, 3, 0, 10).unwrap_err(),
            PaginationError::InvalidPage(0)
        );
        assert_eq!(
            Paginator::new(&items, 3, -2, 10).unwrap_err(),
            PaginationError::InvalidPage(-2)
        );
        assert_eq!(
            Paginator::new(&items, 3, 1, 0).unwrap_err(),
            PaginationError::InvalidItemsPerPage(0)
        );
        assert_eq!(
            Paginator::new(&items, 3, 1, -5).unwrap_err(),
            PaginationError::InvalidItemsPerPage(-5)
        );
    }
}
