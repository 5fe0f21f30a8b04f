//! Listing search: raw parameter normalisation and query composition.
//!
//! Raw query-string values arrive as optional strings in [`SearchParams`].
//! [`SearchFilters::try_from`] validates them into typed predicates, failing
//! with a field-level [`FieldError`] on the first bad value. A blank value is
//! treated as absent; absence never adds a predicate.
//! [`ListingQuery::public`] then pins the status and attaches ordering.

mod query;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use pagination::{DEFAULT_LIMIT, MAX_LIMIT, PageRequest, PageRequestError};
use serde::{Deserialize, Serialize};

pub use query::{ListingFilter, ListingOrder, ListingQuery};

use super::{FieldError, FieldErrorCode, ListingType, PropertyType, UnknownVariant};

/// Raw listing search parameters as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated search predicates, ordering and page.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub text: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub order: ListingOrder,
    pub page: PageRequest,
}

impl TryFrom<SearchParams> for SearchFilters {
    type Error = FieldError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let SearchParams {
            q,
            state,
            city,
            property_type,
            listing_type,
            bedrooms,
            bathrooms,
            min_price,
            max_price,
            sort_by,
            page,
            limit,
        } = params;

        let min_price = parse_price("minPrice", present(min_price))?;
        let max_price = parse_price("maxPrice", present(max_price))?;
        if let (Some(min), Some(max)) = (&min_price, &max_price) {
            if min > max {
                return Err(FieldError::new(
                    "minPrice",
                    FieldErrorCode::InvalidRange,
                    "minPrice must not exceed maxPrice",
                )
                .with_value(min.to_string()));
            }
        }

        Ok(Self {
            text: present(q),
            state: present(state),
            city: present(city),
            property_type: parse_enum("propertyType", present(property_type))?,
            listing_type: parse_enum("listingType", present(listing_type))?,
            bedrooms: parse_count("bedrooms", present(bedrooms))?,
            bathrooms: parse_count("bathrooms", present(bathrooms))?,
            min_price,
            max_price,
            order: parse_enum::<ListingOrder>("sortBy", present(sort_by))?.unwrap_or_default(),
            page: parse_page_request(page, limit, DEFAULT_LIMIT)?,
        })
    }
}

/// Number of active listings in one state and city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCount {
    pub state: String,
    pub city: String,
    pub count: u64,
}

/// Trim a raw value, treating blank strings as absent.
pub fn present(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Parse a closed-set value such as a property type or sort key.
pub fn parse_enum<T>(field: &'static str, raw: Option<String>) -> Result<Option<T>, FieldError>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.map(|value| {
        value.parse::<T>().map_err(|error| {
            FieldError::new(
                field,
                FieldErrorCode::InvalidEnum,
                format!("{field} must be one of: {}", error.expected),
            )
            .with_value(value)
        })
    })
    .transpose()
}

fn parse_count(field: &'static str, raw: Option<String>) -> Result<Option<i32>, FieldError> {
    raw.map(|value| {
        let parsed = value.parse::<i32>().map_err(|_| {
            FieldError::new(
                field,
                FieldErrorCode::InvalidNumber,
                format!("{field} must be a whole number"),
            )
            .with_value(value.clone())
        })?;
        if parsed < 0 {
            return Err(FieldError::new(
                field,
                FieldErrorCode::Negative,
                format!("{field} must not be negative"),
            )
            .with_value(value));
        }
        Ok(parsed)
    })
    .transpose()
}

fn parse_price(field: &'static str, raw: Option<String>) -> Result<Option<BigDecimal>, FieldError> {
    raw.map(|value| {
        let parsed = BigDecimal::from_str(&value).map_err(|_| {
            FieldError::new(
                field,
                FieldErrorCode::InvalidNumber,
                format!("{field} must be a number"),
            )
            .with_value(value.clone())
        })?;
        if parsed < BigDecimal::from(0) {
            return Err(FieldError::new(
                field,
                FieldErrorCode::Negative,
                format!("{field} must not be negative"),
            )
            .with_value(value));
        }
        Ok(parsed)
    })
    .transpose()
}

fn parse_page_number(field: &'static str, raw: Option<String>) -> Result<Option<u32>, FieldError> {
    raw.map(|value| {
        value.parse::<i64>().map_err(|_| {
            FieldError::new(
                field,
                FieldErrorCode::InvalidNumber,
                format!("{field} must be a whole number"),
            )
            .with_value(value.clone())
        })
        .and_then(|parsed| {
            u32::try_from(parsed).map_err(|_| {
                FieldError::new(
                    field,
                    FieldErrorCode::OutOfRange,
                    format!("{field} is out of range"),
                )
                .with_value(value.clone())
            })
        })
    })
    .transpose()
}

/// Parse `page` and `limit`, applying defaults for absent values.
///
/// Page numbers start at one; `limit` must lie in `1..=100`.
pub fn parse_page_request(
    page: Option<String>,
    limit: Option<String>,
    default_limit: u32,
) -> Result<PageRequest, FieldError> {
    let page = parse_page_number("page", present(page))?;
    let limit = parse_page_number("limit", present(limit))?;
    PageRequest::with_defaults(page, limit, default_limit).map_err(|error| match error {
        PageRequestError::PageOutOfRange { page } => {
            FieldError::new("page", FieldErrorCode::OutOfRange, "page must be at least 1")
                .with_value(page.to_string())
        }
        PageRequestError::LimitOutOfRange { limit, .. } => FieldError::new(
            "limit",
            FieldErrorCode::OutOfRange,
            format!("limit must be between 1 and {MAX_LIMIT}"),
        )
        .with_value(limit.to_string()),
    })
}
