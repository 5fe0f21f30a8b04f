//! Favorites service implementing the favorites driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::listing_service::load_listing;
use crate::domain::ports::{
    FavoritePersistenceError, FavoriteRepository, FavoritesCommand, FavoritesQuery,
    ListingRepository,
};
use crate::domain::{Error, Favorite, FavoriteListing, ListingId, UserId};

#[derive(Clone)]
pub struct FavoritesService<F, L> {
    favorites: Arc<F>,
    listings: Arc<L>,
}

impl<F, L> FavoritesService<F, L> {
    pub fn new(favorites: Arc<F>, listings: Arc<L>) -> Self {
        Self {
            favorites,
            listings,
        }
    }
}

fn map_favorite_error(error: FavoritePersistenceError) -> Error {
    match error {
        FavoritePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("favorite repository unavailable: {message}"))
        }
        FavoritePersistenceError::Query { message } => {
            Error::internal(format!("favorite repository error: {message}"))
        }
        FavoritePersistenceError::Duplicate => Error::conflict("property already in favorites"),
    }
}

#[async_trait]
impl<F, L> FavoritesCommand for FavoritesService<F, L>
where
    F: FavoriteRepository,
    L: ListingRepository,
{
    async fn add(&self, user_id: &UserId, listing_id: &ListingId) -> Result<Favorite, Error> {
        load_listing(self.listings.as_ref(), listing_id).await?;
        let favorite = Favorite {
            user_id: *user_id,
            listing_id: *listing_id,
            created_at: Utc::now(),
        };
        self.favorites
            .add(&favorite)
            .await
            .map_err(map_favorite_error)?;
        Ok(favorite)
    }

    async fn remove(&self, user_id: &UserId, listing_id: &ListingId) -> Result<(), Error> {
        let removed = self
            .favorites
            .remove(user_id, listing_id)
            .await
            .map_err(map_favorite_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("favorite not found"))
        }
    }
}

#[async_trait]
impl<F, L> FavoritesQuery for FavoritesService<F, L>
where
    F: FavoriteRepository,
    L: ListingRepository,
{
    async fn list(&self, user_id: &UserId) -> Result<Vec<FavoriteListing>, Error> {
        self.favorites
            .list_for_user(user_id)
            .await
            .map_err(map_favorite_error)
    }

    async fn is_favorite(&self, user_id: &UserId, listing_id: &ListingId) -> Result<bool, Error> {
        self.favorites
            .exists(user_id, listing_id)
            .await
            .map_err(map_favorite_error)
    }
}
