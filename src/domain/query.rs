//! List query state and the server's pagination envelope.

use serde::{Deserialize, Serialize};

use crate::domain::filter::FilterDescriptor;
use crate::domain::lead::Lead;

/// Rows requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// `(page, limit, filters)`: everything that determines a list request.
///
/// Replaced wholesale on every change, never patched in place.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryState {
    pub page: usize,
    pub limit: usize,
    #[serde(default)]
    pub filters: FilterDescriptor,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    /// First page, no filters, `limit` rows per page.
    pub fn new(limit: usize) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            filters: FilterDescriptor::new(),
        }
    }

    /// Same limit, new filters, back to the first page.
    pub fn with_filters(&self, filters: FilterDescriptor) -> Self {
        Self {
            page: 1,
            limit: self.limit,
            filters,
        }
    }

    /// Same limit and filters on another page.
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            limit: self.limit,
            filters: self.filters.clone(),
        }
    }

    /// Query string pairs for `GET /api/leads`; `filters` is omitted when empty.
    pub fn to_query_pairs(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if !self.filters.is_empty() {
            pairs.push(("filters", self.filters.to_json()?));
        }
        Ok(pairs)
    }
}

/// Pagination metadata copied verbatim from the last successful list call.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl PaginationState {
    /// Whether `page` is a valid navigation target.
    pub fn contains_page(&self, page: usize) -> bool {
        page >= 1 && page <= self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Response envelope of the list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadPage {
    #[serde(default)]
    pub data: Vec<Lead>,
    #[serde(flatten)]
    pub pagination: PaginationState,
}
