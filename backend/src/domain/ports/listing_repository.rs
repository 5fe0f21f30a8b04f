//! Port abstraction for listing persistence.
//!
//! Adapters evaluate [`ListingFilter`] natively. Counting and fetching take
//! the same predicate so the paginator can run them side by side.
use async_trait::async_trait;

use crate::domain::{
    DateRange, Listing, ListingFilter, ListingId, ListingQuery, ListingStatus, LocationCount,
    PropertyType,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError>;

    /// Overwrite a stored listing. Returns `false` when it no longer exists.
    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError>;

    /// Remove a listing and its favorites. Returns `false` when absent.
    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError>;

    /// One page of listings matching the query, in the query's order.
    async fn fetch_page(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingPersistenceError>;

    /// Number of listings matching `filter`.
    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingPersistenceError>;

    /// Number of listings created inside `range`.
    async fn count_created(&self, range: &DateRange) -> Result<u64, ListingPersistenceError>;

    /// Sparse `(type, count)` rows for listings matching `filter` and
    /// created inside `range`.
    async fn count_by_type(
        &self,
        filter: &ListingFilter,
        range: &DateRange,
    ) -> Result<Vec<(PropertyType, u64)>, ListingPersistenceError>;

    /// Sparse `(status, count)` rows for listings created inside `range`.
    async fn count_by_status(
        &self,
        range: &DateRange,
    ) -> Result<Vec<(ListingStatus, u64)>, ListingPersistenceError>;

    /// Listing counts grouped by state and city, most listings first, ties
    /// ordered by state then city.
    async fn count_by_location(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<LocationCount>, ListingPersistenceError>;

    /// The most recently created listings, whatever their status.
    async fn recent(&self, limit: u32) -> Result<Vec<Listing>, ListingPersistenceError>;
}
