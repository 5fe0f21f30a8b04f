//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use realestatehub::domain::ports::MAX_IMAGE_BYTES;
use realestatehub::outbound::persistence::{DbPool, PoolConfig, PoolError};
use tracing::info;

use super::settings::{Settings, SettingsError};

/// Where listing images are written and the URL prefix they are served at.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub(crate) dir: PathBuf,
    pub(crate) base_url: String,
}

/// Failures while assembling [`ServerConfig`] from settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) images: ImageConfig,
    pub(crate) upload_limit: usize,
}

impl ServerConfig {
    /// Construct a server configuration from its required parts.
    ///
    /// Data stays in memory and images go to `./uploads` until
    /// [`ServerConfig::with_db_pool`] and [`ServerConfig::with_images`] say
    /// otherwise.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            images: ImageConfig {
                dir: PathBuf::from("uploads"),
                base_url: "/uploads".to_owned(),
            },
            upload_limit: MAX_IMAGE_BYTES,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_images(mut self, dir: PathBuf, base_url: impl Into<String>) -> Self {
        self.images = ImageConfig {
            dir,
            base_url: base_url.into(),
        };
        self
    }

    #[must_use]
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }

    /// Resolve settings into a configuration, connecting to PostgreSQL when
    /// a database URL is set.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a setting is invalid or the pool cannot
    /// be built.
    pub async fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let config = Self::new(
            settings.session_key()?,
            settings.cookie_secure(),
            settings.same_site()?,
            settings.bind_addr()?,
        )
        .with_images(settings.image_dir(), settings.image_base_url())
        .with_upload_limit(settings.upload_limit_bytes());

        match settings.database_url.as_deref() {
            Some(url) => {
                let mut pool_config = PoolConfig::new(url);
                if let Some(size) = settings.db_pool_size {
                    pool_config = pool_config.with_max_size(size);
                }
                let pool = DbPool::new(pool_config).await?;
                info!("using PostgreSQL persistence");
                Ok(config.with_db_pool(pool))
            }
            None => {
                info!("no database URL configured; using in-memory persistence");
                Ok(config)
            }
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
