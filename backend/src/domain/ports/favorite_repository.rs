//! Port abstraction for favorite persistence.
use async_trait::async_trait;

use crate::domain::{DateRange, Favorite, FavoriteListing, ListingId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by favorite repository adapters.
    pub enum FavoritePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "favorite repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "favorite repository query failed: {message}",
        /// The pair is already stored.
        Duplicate => "favorite already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Store a new pair; fails with `Duplicate` when it already exists.
    async fn add(&self, favorite: &Favorite) -> Result<(), FavoritePersistenceError>;

    /// Delete a pair. Returns `false` when there was nothing to delete.
    async fn remove(
        &self,
        user_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, FavoritePersistenceError>;

    async fn exists(
        &self,
        user_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, FavoritePersistenceError>;

    /// The user's favorites with their listings, most recently saved first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<FavoriteListing>, FavoritePersistenceError>;

    /// Number of favorites created inside `range`.
    async fn count_created(&self, range: &DateRange) -> Result<u64, FavoritePersistenceError>;
}
