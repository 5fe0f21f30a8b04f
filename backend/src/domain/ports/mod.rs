//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, image storage) expose their own
//! error enums so adapters map failures into predictable variants. Driving
//! ports return the domain [`crate::domain::Error`] directly.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod admin;
mod favorite_repository;
mod favorites_command;
mod image_store;
mod listing_repository;
mod listings_command;
mod listings_query;
mod login_service;
mod password_hasher;
mod user_profile_query;
mod user_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use admin::{AdminCommand, AdminQuery};
#[cfg(test)]
pub use admin::{MockAdminCommand, MockAdminQuery};
#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
pub use favorite_repository::{FavoritePersistenceError, FavoriteRepository};
pub use favorites_command::{FavoritesCommand, FavoritesQuery};
#[cfg(test)]
pub use favorites_command::{MockFavoritesCommand, MockFavoritesQuery};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{
    IMAGE_EXTENSIONS, ImageStore, ImageStoreError, ImageUpload, MAX_IMAGE_BYTES,
};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingPersistenceError, ListingRepository};
pub use listings_command::ListingsCommand;
#[cfg(test)]
pub use listings_command::MockListingsCommand;
pub use listings_query::ListingsQuery;
#[cfg(test)]
pub use listings_query::MockListingsQuery;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserFilter, UserPersistenceError, UserRepository};
