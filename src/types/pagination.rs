//! Pagination types for list endpoints.

use sea_orm::Order;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters, reusable across all list endpoints.
///
/// Pages are 1-indexed. Listings default to descending creation time
/// unless an explicit `sort_by` field is supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Optional explicit sort field (whitelisted per resource)
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction, only meaningful with `sort_by`
    #[serde(default)]
    pub order: Option<SortOrder>,
}

/// Sort direction for explicit sort fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }

    /// Zero-indexed page number as SeaORM's paginator expects it
    pub fn zero_indexed_page(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Requested sort direction, descending when unspecified
    pub fn sort_order(&self) -> Order {
        match self.order {
            Some(SortOrder::Asc) => Order::Asc,
            _ => Order::Desc,
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
            sort_by: None,
            order: None,
        }
    }
}

/// Paginated response wrapper, reusable for all list responses
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Map the payload type while keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_indexed() {
        let params = PaginationParams {
            page: 3,
            per_page: 10,
            sort_by: None,
            order: None,
        };
        assert_eq!(params.zero_indexed_page(), 2);
    }

    #[test]
    fn limit_is_capped() {
        let params = PaginationParams {
            page: 1,
            per_page: 10_000,
            sort_by: None,
            order: None,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn page_zero_clamps_to_first() {
        let params = PaginationParams {
            page: 0,
            per_page: 20,
            sort_by: None,
            order: None,
        };
        assert_eq!(params.zero_indexed_page(), 0);
    }
}
