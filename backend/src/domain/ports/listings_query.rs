//! Driving port for public listing reads.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Error, Listing, ListingId, LocationCount, SearchFilters, TypeCount};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// Search active listings.
    async fn search(&self, filters: SearchFilters) -> Result<Paginated<Listing>, Error>;

    /// Fetch one listing by id, whatever its status.
    async fn get(&self, id: &ListingId) -> Result<Listing, Error>;

    /// Active listing counts per state and city.
    async fn locations(&self) -> Result<Vec<LocationCount>, Error>;

    /// Active listing counts per property type.
    async fn property_types(&self) -> Result<Vec<TypeCount>, Error>;
}
