//! In-memory adapters for running without PostgreSQL.
//!
//! [`MemoryStore`] keeps users, listings and favorites behind one mutex so
//! cascades (deleting a listing drops its favorites) stay atomic. It
//! evaluates [`ListingFilter`](crate::domain::ListingFilter) and
//! [`ListingOrder`](crate::domain::ListingOrder) directly, which makes it the
//! reference the Diesel adapter is checked against.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    FavoritePersistenceError, FavoriteRepository, ListingPersistenceError, ListingRepository,
    UserFilter, UserPersistenceError, UserRepository,
};
use crate::domain::{
    DateRange, Email, Favorite, FavoriteListing, Listing, ListingFilter, ListingId, ListingQuery,
    ListingStatus, LocationCount, PropertyType, Role, User, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    listings: HashMap<ListingId, Listing>,
    favorites: Vec<Favorite>,
}

/// Mutex-guarded store implementing every persistence port.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(
        &self,
        poisoned: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, State>, E> {
        self.state
            .lock()
            .map_err(|_| poisoned("memory store lock poisoned"))
    }
}

fn window<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    items
        .into_iter()
        .skip(skip)
        .take(page.limit() as usize)
        .collect()
}

fn count_of<I: Iterator>(items: I) -> u64 {
    items.count() as u64
}

/// Tally `keys` in the order they first appear.
fn tally<K: PartialEq>(keys: impl Iterator<Item = K>) -> Vec<(K, u64)> {
    let mut counts: Vec<(K, u64)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(seen, _)| *seen == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if state.users.values().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        Ok(match state.users.get_mut(user.id()) {
            Some(stored) => {
                *stored = user.clone();
                true
            }
            None => false,
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.values().find(|user| user.email() == email).cloned())
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        users.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
        });
        Ok(window(users, page))
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(count_of(state.users.values().filter(|user| filter.matches(user))))
    }

    async fn count_created(&self, range: &DateRange) -> Result<u64, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(count_of(
            state
                .users
                .values()
                .filter(|user| range.contains(user.created_at())),
        ))
    }

    async fn count_by_role(
        &self,
        range: &DateRange,
    ) -> Result<Vec<(Role, u64)>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(tally(
            state
                .users
                .values()
                .filter(|user| range.contains(user.created_at()))
                .map(User::role),
        ))
    }

    async fn recent(&self, limit: u32) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        newest_first(&mut users, User::created_at);
        users.truncate(limit as usize);
        Ok(users)
    }
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut state = self.lock(ListingPersistenceError::query)?;
        state.listings.insert(listing.id(), listing.clone());
        Ok(())
    }

    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError> {
        let mut state = self.lock(ListingPersistenceError::query)?;
        Ok(match state.listings.get_mut(&listing.id()) {
            Some(stored) => {
                *stored = listing.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError> {
        let mut state = self.lock(ListingPersistenceError::query)?;
        let removed = state.listings.remove(id).is_some();
        if removed {
            state.favorites.retain(|favorite| favorite.listing_id != *id);
        }
        Ok(removed)
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        Ok(state.listings.get(id).cloned())
    }

    async fn fetch_page(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        let mut listings: Vec<Listing> = state
            .listings
            .values()
            .filter(|listing| query.filter.matches(listing))
            .cloned()
            .collect();
        listings.sort_by(|a, b| query.order.compare(a, b));
        Ok(window(listings, query.page))
    }

    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        Ok(count_of(
            state.listings.values().filter(|listing| filter.matches(listing)),
        ))
    }

    async fn count_created(&self, range: &DateRange) -> Result<u64, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        Ok(count_of(
            state
                .listings
                .values()
                .filter(|listing| range.contains(listing.created_at())),
        ))
    }

    async fn count_by_type(
        &self,
        filter: &ListingFilter,
        range: &DateRange,
    ) -> Result<Vec<(PropertyType, u64)>, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        Ok(tally(
            state
                .listings
                .values()
                .filter(|listing| filter.matches(listing) && range.contains(listing.created_at()))
                .map(|listing| listing.details().property_type()),
        ))
    }

    async fn count_by_status(
        &self,
        range: &DateRange,
    ) -> Result<Vec<(ListingStatus, u64)>, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        Ok(tally(
            state
                .listings
                .values()
                .filter(|listing| range.contains(listing.created_at()))
                .map(Listing::status),
        ))
    }

    async fn count_by_location(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<LocationCount>, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        let mut locations: Vec<LocationCount> = tally(
            state
                .listings
                .values()
                .filter(|listing| filter.matches(listing))
                .map(|listing| {
                    (
                        listing.details().state().to_owned(),
                        listing.details().city().to_owned(),
                    )
                }),
        )
        .into_iter()
        .map(|((state, city), count)| LocationCount { state, city, count })
        .collect();
        locations.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.state.cmp(&b.state))
                .then_with(|| a.city.cmp(&b.city))
        });
        Ok(locations)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<Listing>, ListingPersistenceError> {
        let state = self.lock(ListingPersistenceError::query)?;
        let mut listings: Vec<Listing> = state.listings.values().cloned().collect();
        newest_first(&mut listings, Listing::created_at);
        listings.truncate(limit as usize);
        Ok(listings)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn add(&self, favorite: &Favorite) -> Result<(), FavoritePersistenceError> {
        let mut state = self.lock(FavoritePersistenceError::query)?;
        let exists = state.favorites.iter().any(|stored| {
            stored.user_id == favorite.user_id && stored.listing_id == favorite.listing_id
        });
        if exists {
            return Err(FavoritePersistenceError::duplicate());
        }
        state.favorites.push(favorite.clone());
        Ok(())
    }

    async fn remove(
        &self,
        user_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, FavoritePersistenceError> {
        let mut state = self.lock(FavoritePersistenceError::query)?;
        let before = state.favorites.len();
        state
            .favorites
            .retain(|stored| !(stored.user_id == *user_id && stored.listing_id == *listing_id));
        Ok(state.favorites.len() != before)
    }

    async fn exists(
        &self,
        user_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, FavoritePersistenceError> {
        let state = self.lock(FavoritePersistenceError::query)?;
        Ok(state
            .favorites
            .iter()
            .any(|stored| stored.user_id == *user_id && stored.listing_id == *listing_id))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<FavoriteListing>, FavoritePersistenceError> {
        let state = self.lock(FavoritePersistenceError::query)?;
        let mut saved: Vec<FavoriteListing> = state
            .favorites
            .iter()
            .filter(|favorite| favorite.user_id == *user_id)
            .filter_map(|favorite| {
                state
                    .listings
                    .get(&favorite.listing_id)
                    .map(|listing| FavoriteListing {
                        listing: listing.clone(),
                        favorited_at: favorite.created_at,
                    })
            })
            .collect();
        newest_first(&mut saved, |favorite| favorite.favorited_at);
        Ok(saved)
    }

    async fn count_created(&self, range: &DateRange) -> Result<u64, FavoritePersistenceError> {
        let state = self.lock(FavoritePersistenceError::query)?;
        Ok(count_of(
            state
                .favorites
                .iter()
                .filter(|favorite| range.contains(favorite.created_at)),
        ))
    }
}
