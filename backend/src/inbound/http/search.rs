//! Search HTTP handlers.
//!
//! ```text
//! GET /api/v1/search?q=lekki&propertyType=APARTMENT&page=2
//! GET /api/v1/search/locations
//! GET /api/v1/search/types
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, LocationCount, SearchParams, TypeCount};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

use super::listings::run_search;
use super::listings_dto::ListingPage;

/// Active listings in one state and city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocationCountBody {
    #[schema(example = "Lagos")]
    pub state: String,
    #[schema(example = "Lekki")]
    pub city: String,
    #[schema(example = 12)]
    pub count: u64,
}

impl From<LocationCount> for LocationCountBody {
    fn from(value: LocationCount) -> Self {
        Self {
            state: value.state,
            city: value.city,
            count: value.count,
        }
    }
}

/// Active listings of one property type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TypeCountBody {
    #[serde(rename = "type")]
    #[schema(example = "APARTMENT")]
    pub property_type: String,
    #[schema(example = 7)]
    pub count: u64,
}

impl From<TypeCount> for TypeCountBody {
    fn from(value: TypeCount) -> Self {
        Self {
            property_type: value.property_type.to_string(),
            count: value.count,
        }
    }
}

/// Search active listings. Accepts the same parameters as
/// `GET /api/v1/properties`.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(
        ("q" = Option<String>, Query, description = "Text matched against title, description, address and city"),
        ("state" = Option<String>, Query, description = "Case-insensitive state substring"),
        ("city" = Option<String>, Query, description = "Case-insensitive city substring"),
        ("propertyType" = Option<String>, Query, description = "HOUSE, APARTMENT or LAND"),
        ("listingType" = Option<String>, Query, description = "SALE or RENT"),
        ("bedrooms" = Option<String>, Query, description = "Exact bedroom count"),
        ("bathrooms" = Option<String>, Query, description = "Exact bathroom count"),
        ("minPrice" = Option<String>, Query, description = "Inclusive lower price bound"),
        ("maxPrice" = Option<String>, Query, description = "Inclusive upper price bound"),
        ("sortBy" = Option<String>, Query, description = "newest, price_asc or price_desc"),
        ("page" = Option<String>, Query, description = "Page number, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 10, max 100")
    ),
    responses(
        (status = 200, description = "Matching listings", body = ListingPage),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["search"],
    operation_id = "searchProperties",
    security([])
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchParams>,
) -> ApiResult<web::Json<ListingPage>> {
    run_search(&state, query.into_inner()).await.map(web::Json)
}

/// Active listing counts per location, most listings first.
#[utoipa::path(
    get,
    path = "/api/v1/search/locations",
    responses(
        (status = 200, description = "Location counts", body = [LocationCountBody]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["search"],
    operation_id = "searchLocations",
    security([])
)]
#[get("/search/locations")]
pub async fn locations(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LocationCountBody>>> {
    let counts = state.listings.locations().await?;
    Ok(web::Json(
        counts.into_iter().map(LocationCountBody::from).collect(),
    ))
}

/// Active listing counts per property type.
#[utoipa::path(
    get,
    path = "/api/v1/search/types",
    responses(
        (status = 200, description = "Property type counts", body = [TypeCountBody]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["search"],
    operation_id = "searchPropertyTypes",
    security([])
)]
#[get("/search/types")]
pub async fn property_types(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TypeCountBody>>> {
    let counts = state.listings.property_types().await?;
    Ok(web::Json(counts.into_iter().map(TypeCountBody::from).collect()))
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
