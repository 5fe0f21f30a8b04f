//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain types,
//! sharing one `bb8` pool of `diesel-async` connections. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module, and every database failure is mapped to the port's error enum.
//!
//! ```ignore
//! use realestatehub::outbound::persistence::{DbPool, DieselListingRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/realestatehub")).await?;
//! let listings = DieselListingRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_favorite_repository;
mod diesel_listing_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;
mod text_search;

pub use diesel_favorite_repository::DieselFavoriteRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_POOL_SIZE, DbPool, PoolConfig, PoolError};
