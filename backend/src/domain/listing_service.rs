//! Listing services: public search and owner mutations.
//!
//! Search composes the public query (status pinned to ACTIVE) and pages it
//! with [`paginate`]. Mutations authorize the actor against the stored
//! owner before writing anything.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::Paginated;
use tracing::{info, warn};

use crate::domain::ports::{
    ImageStore, ImageStoreError, ImageUpload, ListingPersistenceError, ListingRepository,
    ListingsCommand, ListingsQuery,
};
use crate::domain::{
    Action, Actor, DateRange, Error, Listing, ListingDetails, ListingFilter, ListingId,
    ListingPatch, ListingQuery, ListingStatus, LocationCount, SearchFilters, TypeCount, paginate,
    type_counts,
};

/// Listing service implementing the listing driving ports.
#[derive(Clone)]
pub struct ListingService<L, I> {
    listings: Arc<L>,
    images: Arc<I>,
}

impl<L, I> ListingService<L, I> {
    pub fn new(listings: Arc<L>, images: Arc<I>) -> Self {
        Self { listings, images }
    }
}

pub(crate) fn map_listing_error(error: ListingPersistenceError) -> Error {
    match error {
        ListingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingPersistenceError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("image store unavailable: {message}"))
        }
        other => Error::internal(other.to_string()),
    }
}

pub(crate) fn listing_not_found() -> Error {
    Error::not_found("property not found")
}

/// Load a listing or fail with `not_found`.
pub(crate) async fn load_listing<L>(listings: &L, id: &ListingId) -> Result<Listing, Error>
where
    L: ListingRepository + ?Sized,
{
    listings
        .find_by_id(id)
        .await
        .map_err(map_listing_error)?
        .ok_or_else(listing_not_found)
}

/// Persist an updated listing or fail with `not_found` if it vanished.
pub(crate) async fn save_listing<L>(listings: &L, listing: &Listing) -> Result<(), Error>
where
    L: ListingRepository + ?Sized,
{
    if listings.update(listing).await.map_err(map_listing_error)? {
        Ok(())
    } else {
        Err(listing_not_found())
    }
}

/// Delete a listing, then its stored images.
///
/// Image cleanup failures are logged and do not fail the deletion.
pub(crate) async fn remove_listing<L, I>(
    listings: &L,
    images: &I,
    listing: &Listing,
) -> Result<(), Error>
where
    L: ListingRepository + ?Sized,
    I: ImageStore + ?Sized,
{
    if !listings
        .delete(&listing.id())
        .await
        .map_err(map_listing_error)?
    {
        return Err(listing_not_found());
    }
    for url in listing.images() {
        if let Err(error) = images.delete(url).await {
            warn!(listing_id = %listing.id(), %url, %error, "failed to delete listing image");
        }
    }
    info!(listing_id = %listing.id(), "listing deleted");
    Ok(())
}

/// Best-effort removal of images whose listing update never landed.
async fn discard_images<I>(images: &I, urls: &[String])
where
    I: ImageStore + ?Sized,
{
    for url in urls {
        if let Err(error) = images.delete(url).await {
            warn!(%url, %error, "failed to roll back stored image");
        }
    }
}

fn active_only() -> ListingFilter {
    ListingFilter {
        status: Some(ListingStatus::Active),
        ..ListingFilter::default()
    }
}

#[async_trait]
impl<L, I> ListingsQuery for ListingService<L, I>
where
    L: ListingRepository,
    I: ImageStore,
{
    async fn search(&self, filters: SearchFilters) -> Result<Paginated<Listing>, Error> {
        let query = ListingQuery::public(filters);
        paginate(
            query.page,
            async {
                self.listings
                    .fetch_page(&query)
                    .await
                    .map_err(map_listing_error)
            },
            async {
                self.listings
                    .count(&query.filter)
                    .await
                    .map_err(map_listing_error)
            },
        )
        .await
    }

    async fn get(&self, id: &ListingId) -> Result<Listing, Error> {
        load_listing(self.listings.as_ref(), id).await
    }

    async fn locations(&self) -> Result<Vec<LocationCount>, Error> {
        self.listings
            .count_by_location(&active_only())
            .await
            .map_err(map_listing_error)
    }

    async fn property_types(&self) -> Result<Vec<TypeCount>, Error> {
        let rows = self
            .listings
            .count_by_type(&active_only(), &DateRange::default())
            .await
            .map_err(map_listing_error)?;
        Ok(type_counts(&rows))
    }
}

#[async_trait]
impl<L, I> ListingsCommand for ListingService<L, I>
where
    L: ListingRepository,
    I: ImageStore,
{
    async fn create(&self, actor: &Actor, details: ListingDetails) -> Result<Listing, Error> {
        actor.require(Action::CreateListing, None)?;
        let listing = Listing::create(actor.user_id, details, Utc::now());
        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_error)?;
        info!(listing_id = %listing.id(), owner_id = %actor.user_id, "listing created");
        Ok(listing)
    }

    async fn update(
        &self,
        actor: &Actor,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<Listing, Error> {
        let current = load_listing(self.listings.as_ref(), id).await?;
        actor.require(Action::UpdateListing, Some(current.owner_id()))?;
        let now = Utc::now();
        let status = patch.status;
        let details = current.details().patched(patch)?;
        let mut updated = current.with_details(details, now);
        if let Some(status) = status {
            updated = updated.with_status(status, now);
        }
        save_listing(self.listings.as_ref(), &updated).await?;
        if status.is_some_and(ListingStatus::is_terminal) {
            info!(listing_id = %updated.id(), status = %updated.status(), "listing closed");
        }
        Ok(updated)
    }

    async fn delete(&self, actor: &Actor, id: &ListingId) -> Result<(), Error> {
        let listing = load_listing(self.listings.as_ref(), id).await?;
        actor.require(Action::DeleteListing, Some(listing.owner_id()))?;
        remove_listing(self.listings.as_ref(), self.images.as_ref(), &listing).await
    }

    async fn add_images(
        &self,
        actor: &Actor,
        id: &ListingId,
        uploads: Vec<ImageUpload>,
    ) -> Result<Listing, Error> {
        let listing = load_listing(self.listings.as_ref(), id).await?;
        actor.require(Action::UploadListingImages, Some(listing.owner_id()))?;
        if uploads.is_empty() {
            return Err(Error::invalid_request("no images provided"));
        }

        let mut urls = Vec::with_capacity(uploads.len());
        for upload in &uploads {
            match self.images.store(upload).await {
                Ok(url) => urls.push(url),
                Err(error) => {
                    discard_images(self.images.as_ref(), &urls).await;
                    return Err(map_image_error(error));
                }
            }
        }

        let updated = listing.with_images_appended(urls.clone(), Utc::now());
        if let Err(error) = save_listing(self.listings.as_ref(), &updated).await {
            discard_images(self.images.as_ref(), &urls).await;
            return Err(error);
        }
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "listing_service_tests.rs"]
mod tests;
