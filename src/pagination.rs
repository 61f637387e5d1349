//! Fixed-size pagination over ordered result sets.
//!
//! Listings count first, derive a page window, then fetch with LIMIT/OFFSET.
//! Page numbers are 1-based and come from the `page` query parameter; absent
//! or unparsable values fall back to the first page, and out-of-range values
//! clamp to the nearest valid page instead of erroring. An empty result set
//! still has exactly one (empty) page.

use serde::{Deserialize, Serialize};

/// Lenient `?page=` query parameter. Kept as a raw string so junk input
/// defaults to page 1 instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page number, if the parameter parses as a positive integer.
    pub fn requested(&self) -> Option<i64> {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
    }
}

/// LIMIT/OFFSET window for one page of a counted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub offset: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: i64,
}

impl Paginator {
    pub fn new(page_size: i64) -> Self {
        debug_assert!(page_size > 0);
        Self { page_size }
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Resolve a requested page against the total item count, clamping to
    /// the valid range.
    pub fn window(&self, total_items: i64, requested: Option<i64>) -> PageWindow {
        let total_items = total_items.max(0);
        let total_pages = ((total_items + self.page_size - 1) / self.page_size).max(1);
        let number = requested.unwrap_or(1).clamp(1, total_pages);

        PageWindow {
            number,
            offset: (number - 1) * self.page_size,
            limit: self.page_size,
            total_pages,
            total_items,
        }
    }
}

/// One page of items plus the metadata the presentation layer needs to
/// render pager controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Page {
            items,
            page: window.number,
            total_pages: window.total_pages,
            total_items: window.total_items,
            has_next: window.number < window.total_pages,
            has_previous: window.number > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator() -> Paginator {
        Paginator::new(10)
    }

    #[test]
    fn first_page_window() {
        let window = paginator().window(13, None);
        assert_eq!(window.number, 1);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 10);
        assert_eq!(window.total_pages, 2);
    }

    #[test]
    fn page_k_starts_at_k_minus_one_times_page_size() {
        let window = paginator().window(35, Some(3));
        assert_eq!(window.offset, 20);
        assert_eq!(window.number, 3);
        assert_eq!(window.total_pages, 4);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let window = paginator().window(13, Some(99));
        assert_eq!(window.number, 2);
        assert_eq!(window.offset, 10);
    }

    #[test]
    fn empty_result_set_has_one_empty_page() {
        let window = paginator().window(0, Some(7));
        assert_eq!(window.number, 1);
        assert_eq!(window.offset, 0);
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let window = paginator().window(20, Some(3));
        assert_eq!(window.total_pages, 2);
        assert_eq!(window.number, 2);
    }

    #[test]
    fn page_query_parses_leniently() {
        let page = |raw: Option<&str>| PageQuery {
            page: raw.map(str::to_string),
        };
        assert_eq!(page(Some("2")).requested(), Some(2));
        assert_eq!(page(Some(" 4 ")).requested(), Some(4));
        assert_eq!(page(Some("abc")).requested(), None);
        assert_eq!(page(Some("0")).requested(), None);
        assert_eq!(page(Some("-3")).requested(), None);
        assert_eq!(page(None).requested(), None);
    }

    #[test]
    fn page_metadata_reflects_window() {
        let window = paginator().window(25, Some(2));
        let page = Page::new(vec![1, 2, 3], window);
        assert!(page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.total_items, 25);

        let last = Page::new(vec![5], paginator().window(25, Some(3)));
        assert!(!last.has_next);
        assert!(last.has_previous);
    }
}
