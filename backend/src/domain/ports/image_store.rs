//! Port for listing image storage.
use async_trait::async_trait;

use crate::domain::{FieldError, FieldErrorCode, ListingId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by image storage adapters.
    pub enum ImageStoreError {
        /// The backing store could not be reached.
        Unavailable { message: String } => "image store unavailable: {message}",
        /// Writing or deleting an object failed.
        Storage { message: String } => "image storage failed: {message}",
        /// The URL does not belong to this store.
        ForeignUrl { url: String } => "url is not managed by this store: {url}",
    }
}

/// Extensions accepted for listing images.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// An uploaded image awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub listing_id: ListingId,
    /// Lower-case extension without the dot, already validated.
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate an upload named `filename` for `listing_id`.
    pub fn from_filename(
        listing_id: ListingId,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, FieldError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                FieldError::new(
                    "filename",
                    FieldErrorCode::InvalidEnum,
                    "only image files are allowed (jpeg, jpg, png, gif, webp)",
                )
                .with_value(filename)
            })?;
        if bytes.is_empty() || bytes.len() > MAX_IMAGE_BYTES {
            return Err(FieldError::new(
                "image",
                FieldErrorCode::OutOfRange,
                "image must be between 1 byte and 10 MiB",
            ));
        }
        Ok(Self {
            listing_id,
            extension,
            bytes,
        })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image and return its public URL.
    async fn store(&self, upload: &ImageUpload) -> Result<String, ImageStoreError>;

    /// Delete an image previously returned by [`ImageStore::store`].
    async fn delete(&self, url: &str) -> Result<(), ImageStoreError>;
}
