//! Pagination metadata returned alongside a page of results.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// The `{page, limit, total, pages}` block returned with list responses.
///
/// `pages` is `ceil(total / limit)`, so an empty result set has zero pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationEnvelope {
    /// Requested page, starting at one.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Number of rows matching the query across all pages.
    pub total: u64,
    /// Number of pages needed to cover `total`.
    pub pages: u64,
}

impl PaginationEnvelope {
    /// Describe `request` against a matching-row count.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PaginationEnvelope};
    ///
    /// let request = PageRequest::new(1, 10).expect("valid request");
    /// let envelope = PaginationEnvelope::new(request, 21);
    /// assert_eq!(envelope.pages, 3);
    /// ```
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page(),
            limit: request.limit(),
            total,
            pages: total.div_ceil(u64::from(request.limit())),
        }
    }
}

/// A page of items with its pagination envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on the requested page.
    pub items: Vec<T>,
    /// Metadata describing the page.
    pub pagination: PaginationEnvelope,
}

impl<T> Paginated<T> {
    /// Pair fetched items with the envelope for `request` and `total`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: PaginationEnvelope::new(request, total),
        }
    }

    /// Convert every item while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
