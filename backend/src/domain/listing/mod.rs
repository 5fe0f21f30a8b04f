//! Property listings.
//!
//! A [`Listing`] wraps validated [`ListingDetails`] with identity, ownership,
//! lifecycle status and the ordered list of image URLs.

mod details;
mod enums;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use details::{
    ListingDetails, ListingDetailsDraft, ListingPatch, ListingValidationError, MAX_ROOMS,
};
pub use enums::{AreaUnit, ListingStatus, ListingType, PropertyType, UnknownVariant};

use super::UserId;

/// Stable listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Parse an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.trim()).map(Self)
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field bundle for assembling a [`Listing`].
#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub id: ListingId,
    pub owner_id: UserId,
    pub details: ListingDetails,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A property on the marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    id: ListingId,
    owner_id: UserId,
    details: ListingDetails,
    images: Vec<String>,
    status: ListingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ListingDraft> for Listing {
    fn from(draft: ListingDraft) -> Self {
        let ListingDraft {
            id,
            owner_id,
            details,
            images,
            status,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            owner_id,
            details,
            images,
            status,
            created_at,
            updated_at,
        }
    }
}

impl Listing {
    /// Start a new, active listing with no images.
    pub fn create(owner_id: UserId, details: ListingDetails, now: DateTime<Utc>) -> Self {
        Self {
            id: ListingId::random(),
            owner_id,
            details,
            images: Vec::new(),
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn details(&self) -> &ListingDetails {
        &self.details
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn status(&self) -> ListingStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the content, bumping `updated_at`.
    pub fn with_details(mut self, details: ListingDetails, now: DateTime<Utc>) -> Self {
        self.details = details;
        self.updated_at = now;
        self
    }

    /// Change the lifecycle status, bumping `updated_at`.
    pub fn with_status(mut self, status: ListingStatus, now: DateTime<Utc>) -> Self {
        self.status = status;
        self.updated_at = now;
        self
    }

    /// Append image URLs after the existing ones.
    pub fn with_images_appended(
        mut self,
        urls: impl IntoIterator<Item = String>,
        now: DateTime<Utc>,
    ) -> Self {
        self.images.extend(urls);
        self.updated_at = now;
        self
    }
}
