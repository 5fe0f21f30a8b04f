//! PostgreSQL-backed `FavoriteRepository` implementation using Diesel ORM.
//!
//! The `(user_id, property_id)` primary key enforces one favorite per pair;
//! rows disappear with their listing through `ON DELETE CASCADE`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FavoritePersistenceError, FavoriteRepository};
use crate::domain::{DateRange, Favorite, FavoriteListing, ListingId, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_diesel_error, map_pool_error, to_count,
};
use super::diesel_listing_repository::row_to_listing;
use super::models::{ListingRow, NewFavoriteRow};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, properties};

/// Diesel-backed implementation of the `FavoriteRepository` port.
#[derive(Clone)]
pub struct DieselFavoriteRepository {
    pool: DbPool,
}

impl DieselFavoriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> FavoritePersistenceError {
    map_pool_error(error, FavoritePersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> FavoritePersistenceError {
    if is_unique_violation(&error) {
        return FavoritePersistenceError::duplicate();
    }
    map_diesel_error(
        error,
        FavoritePersistenceError::query,
        FavoritePersistenceError::connection,
    )
}

#[async_trait]
impl FavoriteRepository for DieselFavoriteRepository {
    async fn add(&self, favorite: &Favorite) -> Result<(), FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewFavoriteRow {
            user_id: *favorite.user_id.as_uuid(),
            property_id: *favorite.listing_id.as_uuid(),
            created_at: favorite.created_at,
        };
        diesel::insert_into(favorites::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let pair = favorites::table.find((user_id.as_uuid(), listing_id.as_uuid()));
        let deleted = diesel::delete(pair)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn exists(
        &self,
        user_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::select(diesel::dsl::exists(
            favorites::table.find((user_id.as_uuid(), listing_id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<FavoriteListing>, FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(ListingRow, DateTime<Utc>)> = favorites::table
            .inner_join(properties::table)
            .filter(favorites::user_id.eq(user_id.as_uuid()))
            .order((favorites::created_at.desc(), favorites::property_id.asc()))
            .select((ListingRow::as_select(), favorites::created_at))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|(row, favorited_at)| {
                row_to_listing(row)
                    .map(|listing| FavoriteListing {
                        listing,
                        favorited_at,
                    })
                    .map_err(|error| FavoritePersistenceError::query(error.to_string()))
            })
            .collect()
    }

    async fn count_created(&self, range: &DateRange) -> Result<u64, FavoritePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = favorites::table.into_boxed();
        if let Some(start) = range.start {
            query = query.filter(favorites::created_at.ge(start));
        }
        if let Some(end) = range.end {
            query = query.filter(favorites::created_at.le(end));
        }
        query
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(to_count)
            .map_err(diesel_error)
    }
}
