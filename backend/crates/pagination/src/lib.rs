//! Offset pagination primitives shared by backend list endpoints.
//!
//! A [`PageRequest`] captures a validated 1-based page number and page size.
//! Once the matching-row count is known, [`PaginationEnvelope`] describes the
//! page metadata returned to clients, and [`Paginated`] pairs it with the
//! fetched items.
//!
//! # Examples
//! ```
//! use pagination::{PageRequest, Paginated};
//!
//! let request = PageRequest::new(2, 10).expect("valid page request");
//! assert_eq!(request.offset(), 10);
//!
//! let page = Paginated::new(vec!["a", "b"], request, 12);
//! assert_eq!(page.pagination.pages, 2);
//! ```

mod envelope;
mod request;

pub use envelope::{Paginated, PaginationEnvelope};
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest, PageRequestError};
