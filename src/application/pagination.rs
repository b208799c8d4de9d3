//! Shared page/limit pagination helpers.

use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A 1-based page request. Out-of-range values are clamped rather than
/// rejected so public listing endpoints stay forgiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the totals the response envelope exposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: u64, page: PageRequest) -> Self {
        Self {
            items,
            total,
            page: page.page(),
            limit: page.limit(),
            total_pages: total_pages(total, page.limit()),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

fn total_pages(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps_inputs() {
        let page = PageRequest::new(Some(0), Some(0));
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 1);

        let page = PageRequest::new(Some(3), Some(500));
        assert_eq!(page.limit(), MAX_PAGE_LIMIT);
        assert_eq!(page.offset(), 2 * i64::from(MAX_PAGE_LIMIT));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn second_page_of_25_rows_spans_rows_11_to_20() {
        let page = PageRequest::new(Some(2), Some(10));
        assert_eq!(page.offset(), 10);

        let paged = Paged::new((11..=20).collect::<Vec<u32>>(), 25, page);
        assert_eq!(paged.items.len(), 10);
        assert_eq!(paged.total_pages, 3);
    }
}
