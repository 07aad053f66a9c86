//! Shared types for both native and browser builds.
//!
//! Nothing in here may depend on `tokio`, `reqwest` or `web-sys`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Which slice of a listing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize)
    }

    /// Cut one page out of `rows`.
    pub fn apply<T: Clone>(&self, rows: &[T]) -> Page<T> {
        let total = rows.len();
        let per_page = self.per_page.max(1) as usize;
        let total_pages = total.div_ceil(per_page).max(1) as u32;
        let page = self.page.clamp(1, total_pages);
        let effective = Pagination { page, per_page: self.per_page };
        let start = effective.offset().min(total);
        let end = (start + per_page).min(total);
        Page {
            items: rows[start..end].to_vec(),
            meta: PageMeta {
                page,
                per_page: self.per_page,
                total: total as u64,
                total_pages,
                has_more: end < total,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    /// Rows across all pages.
    pub total: u64,
    pub total_pages: u32,
    pub has_more: bool,
}

impl PageMeta {
    /// "Mostrando 11 a 20 de 42 registros" style range, 1-based and inclusive.
    pub fn range(&self) -> (u64, u64) {
        if self.total == 0 {
            return (0, 0);
        }
        let start = (self.page as u64 - 1) * self.per_page as u64 + 1;
        let end = (start + self.per_page as u64 - 1).min(self.total);
        (start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_and_reports_meta() {
        let rows: Vec<u32> = (1..=23).collect();
        let page = Pagination::new(Some(3), Some(10)).apply(&rows);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.meta.total_pages, 3);
        assert!(!page.meta.has_more);
        assert_eq!(page.meta.range(), (21, 23));
    }

    #[test]
    fn page_past_the_end_is_clamped() {
        let rows: Vec<u32> = (1..=5).collect();
        let page = Pagination::new(Some(9), Some(2)).apply(&rows);
        assert_eq!(page.meta.page, 3);
        assert_eq!(page.items, vec![5]);
    }

    #[test]
    fn empty_listing_has_one_empty_page() {
        let page = Pagination::default().apply::<u32>(&[]);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_pages, 1);
        assert_eq!(page.meta.range(), (0, 0));
    }

    #[test]
    fn bounds_are_sanitized() {
        let p = Pagination::new(Some(0), Some(10_000));
        assert_eq!(p, Pagination { page: 1, per_page: MAX_PER_PAGE });
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: walking every page yields every row exactly once, in order.
            #[test]
            fn pages_cover_all_rows(n in 0usize..200, per_page in 1u32..30) {
                let rows: Vec<usize> = (0..n).collect();
                let first = Pagination::new(Some(1), Some(per_page)).apply(&rows);
                let mut seen = Vec::new();
                for page in 1..=first.meta.total_pages {
                    seen.extend(Pagination::new(Some(page), Some(per_page)).apply(&rows).items);
                }
                prop_assert_eq!(seen, rows);
            }
        }
    }
}
