//! Builders for HTTP state ports.
//!
//! Services are generic over their repositories, so each backend gets its
//! own monomorphised set that is then erased behind the port traits.

use std::sync::Arc;

use actix_web::web;

use realestatehub::domain::ports::{
    FavoriteRepository, ImageStore, ListingRepository, PasswordHasher, UserRepository,
};
use realestatehub::domain::{AccountService, AdminService, FavoritesService, ListingService};
use realestatehub::inbound::http::state::{HttpState, HttpStatePorts};
use realestatehub::outbound::images::FsImageStore;
use realestatehub::outbound::memory::MemoryStore;
use realestatehub::outbound::persistence::{
    DieselFavoriteRepository, DieselListingRepository, DieselUserRepository,
};
use realestatehub::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Wire the account, listing, favorites and admin services over one set of
/// repositories.
fn wire_ports<U, L, F, H, I>(
    users: Arc<U>,
    listings: Arc<L>,
    favorites: Arc<F>,
    hasher: Arc<H>,
    images: Arc<I>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    L: ListingRepository + 'static,
    F: FavoriteRepository + 'static,
    H: PasswordHasher + 'static,
    I: ImageStore + 'static,
{
    let accounts = Arc::new(AccountService::new(users.clone(), hasher));
    let listing_service = Arc::new(ListingService::new(listings.clone(), images.clone()));
    let favorites_service = Arc::new(FavoritesService::new(favorites.clone(), listings.clone()));
    let admin = Arc::new(AdminService::new(users, listings, favorites, images));
    HttpStatePorts {
        login: accounts.clone(),
        profile: accounts.clone(),
        accounts,
        listings: listing_service.clone(),
        listings_command: listing_service,
        favorites: favorites_service.clone(),
        favorites_query: favorites_service,
        admin: admin.clone(),
        admin_command: admin,
    }
}

/// Build HTTP state, using PostgreSQL when a pool is configured and the
/// in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let images = Arc::new(FsImageStore::new(
        config.images.dir.clone(),
        config.images.base_url.clone(),
    ));
    let ports = match &config.db_pool {
        Some(pool) => wire_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselListingRepository::new(pool.clone())),
            Arc::new(DieselFavoriteRepository::new(pool.clone())),
            hasher,
            images,
        ),
        None => {
            let store = Arc::new(MemoryStore::new());
            wire_ports(store.clone(), store.clone(), store, hasher, images)
        }
    };
    web::Data::new(HttpState::new(ports))
}
