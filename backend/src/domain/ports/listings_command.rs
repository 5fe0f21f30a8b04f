//! Driving port for listing mutations.
//!
//! Every operation takes the calling [`Actor`]; authorization runs before
//! any store is touched.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Listing, ListingDetails, ListingId, ListingPatch};

use super::ImageUpload;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsCommand: Send + Sync {
    /// Create an ACTIVE listing owned by the actor.
    async fn create(&self, actor: &Actor, details: ListingDetails) -> Result<Listing, Error>;

    /// Apply a partial update.
    async fn update(
        &self,
        actor: &Actor,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<Listing, Error>;

    /// Delete the listing and clean up its stored images.
    async fn delete(&self, actor: &Actor, id: &ListingId) -> Result<(), Error>;

    /// Store images and append their URLs to the listing.
    async fn add_images(
        &self,
        actor: &Actor,
        id: &ListingId,
        uploads: Vec<ImageUpload>,
    ) -> Result<Listing, Error>;
}
