//! Composed listing queries: a typed predicate plus ordering and page.
//!
//! Store adapters translate [`ListingFilter`] into their native query
//! language; [`ListingFilter::matches`] and [`ListingOrder::compare`] define
//! the reference semantics every adapter must agree with.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use pagination::PageRequest;

use super::SearchFilters;
use crate::domain::{Listing, ListingStatus, ListingType, PropertyType, UnknownVariant};

/// Result ordering for listing queries.
///
/// Every ordering ends with the listing id as a tie-break so that rows with
/// equal sort keys keep a stable position across pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingOrder {
    /// Creation time, most recent first.
    #[default]
    Newest,
    /// Price, cheapest first.
    PriceAsc,
    /// Price, most expensive first.
    PriceDesc,
}

impl ListingOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }

    /// Total order over listings matching what store adapters produce.
    pub fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        let primary = match self {
            Self::Newest => b.created_at().cmp(&a.created_at()),
            Self::PriceAsc => a.details().price().cmp(b.details().price()),
            Self::PriceDesc => b.details().price().cmp(a.details().price()),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

impl fmt::Display for ListingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            _ => Err(UnknownVariant {
                expected: "newest price_asc price_desc",
            }),
        }
    }
}

/// Tagged listing predicate. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Exact status match.
    pub status: Option<ListingStatus>,
    /// Case-insensitive substring of title, description or address.
    pub text: Option<String>,
    /// Case-insensitive substring of the state.
    pub state: Option<String>,
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    /// Exact bedroom count.
    pub bedrooms: Option<i32>,
    /// Exact bathroom count.
    pub bathrooms: Option<i32>,
    /// Inclusive lower price bound.
    pub min_price: Option<BigDecimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<BigDecimal>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ListingFilter {
    /// Whether `listing` satisfies every present predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        let details = listing.details();
        self.status.is_none_or(|status| listing.status() == status)
            && self.text.as_deref().is_none_or(|text| {
                contains_ignore_case(details.title(), text)
                    || details
                        .description()
                        .is_some_and(|description| contains_ignore_case(description, text))
                    || contains_ignore_case(details.address(), text)
            })
            && self
                .state
                .as_deref()
                .is_none_or(|state| contains_ignore_case(details.state(), state))
            && self
                .city
                .as_deref()
                .is_none_or(|city| contains_ignore_case(details.city(), city))
            && self
                .property_type
                .is_none_or(|kind| details.property_type() == kind)
            && self
                .listing_type
                .is_none_or(|kind| details.listing_type() == kind)
            && self
                .bedrooms
                .is_none_or(|count| details.bedrooms() == Some(count))
            && self
                .bathrooms
                .is_none_or(|count| details.bathrooms() == Some(count))
            && self
                .min_price
                .as_ref()
                .is_none_or(|min| details.price() >= min)
            && self
                .max_price
                .as_ref()
                .is_none_or(|max| details.price() <= max)
    }
}

/// A fully composed listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub order: ListingOrder,
    pub page: PageRequest,
}

impl ListingQuery {
    /// Compose the public search query. Status is pinned to ACTIVE whatever
    /// the caller asked for.
    pub fn public(filters: SearchFilters) -> Self {
        let SearchFilters {
            text,
            state,
            city,
            property_type,
            listing_type,
            bedrooms,
            bathrooms,
            min_price,
            max_price,
            order,
            page,
        } = filters;
        Self {
            filter: ListingFilter {
                status: Some(ListingStatus::Active),
                text,
                state,
                city,
                property_type,
                listing_type,
                bedrooms,
                bathrooms,
                min_price,
                max_price,
            },
            order,
            page,
        }
    }

    /// Compose the moderation query: any status unless one is requested,
    /// newest first.
    pub fn moderation(
        status: Option<ListingStatus>,
        property_type: Option<PropertyType>,
        page: PageRequest,
    ) -> Self {
        Self {
            filter: ListingFilter {
                status,
                property_type,
                ..ListingFilter::default()
            },
            order: ListingOrder::Newest,
            page,
        }
    }
}
