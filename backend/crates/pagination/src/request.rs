//! Validated page requests.

/// Page number used when a request omits one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when a request omits one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised when a page request falls outside the accepted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: u32,
    },
    /// Page size is zero or above [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Rejected page size.
        limit: u32,
        /// Largest accepted page size.
        max: u32,
    },
}

/// A 1-based page number and page size.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PageRequestError};
    ///
    /// assert!(PageRequest::new(1, 100).is_ok());
    /// assert_eq!(
    ///     PageRequest::new(0, 10),
    ///     Err(PageRequestError::PageOutOfRange { page: 0 })
    /// );
    /// ```
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from optional inputs, applying [`DEFAULT_PAGE`] and
    /// the supplied default page size.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied value is out of range.
    pub fn with_defaults(
        page: Option<u32>,
        limit: Option<u32>,
        default_limit: u32,
    ) -> Result<Self, PageRequestError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            limit.unwrap_or(default_limit),
        )
    }

    /// The requested page, starting at one.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}
