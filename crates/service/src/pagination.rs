//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct, a `Page` envelope and helpers to
//! normalize inputs.

use serde::Serialize;

/// Fixed listing page size.
pub const PER_PAGE: u32 = 10;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub fn page(page: u32) -> Self { Self { page, ..Self::default() } }

    /// Clamp to sane defaults and convert to `u64` (0-based index, page size)
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: PER_PAGE } }
}

/// One page of results plus the totals needed to render pager links.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total: u64) -> Self {
        let (idx, per_page) = pagination.normalize();
        let last_page = total.div_ceil(per_page).max(1);
        Self { items, page: idx + 1, per_page, total, last_page }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
        }
    }

    pub fn has_more(&self) -> bool { self.page < self.last_page }
}

#[cfg(test)]
mod tests {
    use super::{Page, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 10);
    }

    #[test]
    fn page_totals() {
        let p = Page::new(vec![1, 2, 3], Pagination::page(2), 13);
        assert_eq!(p.page, 2);
        assert_eq!(p.last_page, 2);
        assert!(!p.has_more());

        let empty: Page<i32> = Page::new(vec![], Pagination::page(0), 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.last_page, 1);

        let mapped = Page::new(vec![1, 2], Pagination::page(1), 25).map(|x| x * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.last_page, 3);
        assert!(mapped.has_more());
    }
}
