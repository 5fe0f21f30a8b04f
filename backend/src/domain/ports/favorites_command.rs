//! Driving ports for the caller's saved listings.

use async_trait::async_trait;

use crate::domain::{Error, Favorite, FavoriteListing, ListingId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesCommand: Send + Sync {
    /// Save a listing. Saving twice is a `conflict`; an unknown listing is
    /// `not_found`.
    async fn add(&self, user_id: &UserId, listing_id: &ListingId) -> Result<Favorite, Error>;

    /// Forget a listing. Removing an absent pair is `not_found`.
    async fn remove(&self, user_id: &UserId, listing_id: &ListingId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesQuery: Send + Sync {
    async fn list(&self, user_id: &UserId) -> Result<Vec<FavoriteListing>, Error>;

    async fn is_favorite(&self, user_id: &UserId, listing_id: &ListingId) -> Result<bool, Error>;
}
