//! Saved listings.

use chrono::{DateTime, Utc};

use super::{Listing, ListingId, UserId};

/// A user's bookmark of a listing. At most one exists per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub created_at: DateTime<Utc>,
}

/// A favorite joined with the listing it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteListing {
    pub listing: Listing,
    pub favorited_at: DateTime<Utc>,
}
