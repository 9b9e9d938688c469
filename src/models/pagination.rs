//! Pagination primitives shared across list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters (`page`, `pageSize`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    #[serde(rename = "pageSize", alias = "page_size", alias = "per_page")]
    pub page_size: Option<i64>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_PAGE_SIZE: i64 = 100;

    /// Default items per page.
    const DEFAULT_PAGE_SIZE: i64 = 10;

    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
            .unwrap_or(Self::DEFAULT_PAGE_SIZE)
            .clamp(1, Self::MAX_PAGE_SIZE)
    }

    /// Row offset, saturating for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.current_page() - 1).saturating_mul(self.limit())
    }

    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let per_page = pagination.limit();
        let total_pages = (total + per_page - 1) / per_page;
        Self {
            items,
            total,
            page: pagination.current_page(),
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn pagination_clamps_page_size() {
        assert_eq!(Pagination::new(1, 500).limit(), 100);
        assert_eq!(Pagination::new(1, 0).limit(), 1);
    }

    #[test]
    fn pagination_floors_page() {
        let p = Pagination::new(-4, 10);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagination_offset_calculation() {
        assert_eq!(Pagination::new(3, 10).offset(), 20);
    }

    #[test]
    fn pagination_huge_page_saturates() {
        let p = Pagination::new(i64::MAX, 10);
        assert_eq!(p.offset(), i64::MAX);
        assert_eq!(p.current_page(), i64::MAX);

        let p: Pagination = serde_json::from_str(r#"{"page": 9223372036854775807}"#).unwrap();
        assert!(p.offset() >= 0);
    }

    #[test]
    fn pagination_accepts_client_query_names() {
        let p: Pagination = serde_json::from_str(r#"{"page": 2, "pageSize": 5}"#).unwrap();
        assert_eq!(p.offset(), 5);
        let p: Pagination = serde_json::from_str(r#"{"per_page": 30}"#).unwrap();
        assert_eq!(p.limit(), 30);
    }

    #[test]
    fn paged_result_total_pages() {
        let p = Pagination::new(1, 10);
        let result = PagedResult::new(vec![1, 2, 3], 25, &p);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total, 25);
        assert_eq!(result.page, 1);
    }

    #[test]
    fn paged_result_empty() {
        let result = PagedResult::<i32>::new(vec![], 0, &Pagination::default());
        assert_eq!(result.total_pages, 0);
    }
}
