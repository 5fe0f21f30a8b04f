//! Runtime settings loaded via OrthoConfig.
//!
//! Every field can be set with a `REALESTATEHUB_`-prefixed environment
//! variable (for example `REALESTATEHUB_DATABASE_URL`), a command-line flag
//! or a configuration file. Absent values fall back to the defaults exposed
//! by the accessor methods.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

use realestatehub::domain::ports::MAX_IMAGE_BYTES;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_IMAGE_DIR: &str = "uploads";
const DEFAULT_IMAGE_BASE_URL: &str = "/uploads";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Errors raised while turning settings into server configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid same-site policy '{value}'; expected Strict, Lax or None")]
    SameSite { value: String },
    #[error("same-site None requires secure cookies")]
    InsecureSameSiteNone,
    #[error("failed to read session key at {path:?}: {message}")]
    KeyRead { path: PathBuf, message: String },
    #[error("session key at {path:?} is {length} bytes; at least 64 required")]
    KeyTooShort { path: PathBuf, length: usize },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REALESTATEHUB")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`. Defaults to true.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies. Defaults to `Lax`.
    pub session_same_site: Option<String>,
    /// Directory listing images are written to.
    pub image_dir: Option<PathBuf>,
    /// Public URL prefix the image directory is served under.
    pub image_base_url: Option<String>,
    /// Largest accepted request body for image uploads, in bytes.
    pub upload_limit_bytes: Option<usize>,
}

impl Settings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|error: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    pub fn cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    /// Parse the `SameSite` policy, rejecting `None` on insecure cookies.
    pub fn same_site(&self) -> Result<SameSite, SettingsError> {
        let policy = match self.session_same_site.as_deref().map(str::trim) {
            None | Some("") => SameSite::Lax,
            Some(raw) if raw.eq_ignore_ascii_case("strict") => SameSite::Strict,
            Some(raw) if raw.eq_ignore_ascii_case("lax") => SameSite::Lax,
            Some(raw) if raw.eq_ignore_ascii_case("none") => SameSite::None,
            Some(raw) => {
                return Err(SettingsError::SameSite {
                    value: raw.to_owned(),
                });
            }
        };
        if policy == SameSite::None && !self.cookie_secure() {
            return Err(SettingsError::InsecureSameSiteNone);
        }
        Ok(policy)
    }

    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Load the session signing key.
    ///
    /// Debug builds, and release builds with `session_allow_ephemeral`, fall
    /// back to a generated key when the file cannot be read. A key file that
    /// is readable but too short is always an error.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(path) {
            Ok(mut bytes) => {
                let length = bytes.len();
                let key = (length >= SESSION_KEY_MIN_LEN).then(|| Key::derive_from(&bytes));
                bytes.zeroize();
                key.ok_or_else(|| SettingsError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                })
            }
            Err(error) if cfg!(debug_assertions) || self.session_allow_ephemeral => {
                warn!(path = %path.display(), %error, "using temporary session key");
                Ok(Key::generate())
            }
            Err(error) => Err(SettingsError::KeyRead {
                path: path.to_path_buf(),
                message: error.to_string(),
            }),
        }
    }

    pub fn image_dir(&self) -> PathBuf {
        self.image_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR))
    }

    pub fn image_base_url(&self) -> &str {
        self.image_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_BASE_URL)
    }

    /// Upload body limit; never below the largest accepted image.
    pub fn upload_limit_bytes(&self) -> usize {
        self.upload_limit_bytes
            .unwrap_or(MAX_IMAGE_BYTES)
            .max(MAX_IMAGE_BYTES)
    }
}
