//! Listing HTTP handlers.
//!
//! ```text
//! GET /api/v1/properties?city=Lekki&minPrice=1000000&sortBy=price_asc
//! GET /api/v1/properties/{id}
//! POST /api/v1/properties {"title":"...","price":"3500000",...}
//! PUT /api/v1/properties/{id} {"price":"3200000"}
//! DELETE /api/v1/properties/{id}
//! POST /api/v1/properties/{id}/images?filename=front.jpg <raw image bytes>
//! ```
//!
//! Reads are public. Mutations require a session and are authorised against
//! the caller's current role and the listing's owner.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use tracing::info;

use crate::domain::ports::ImageUpload;
use crate::domain::{
    ApiResult, Error, ListingDetails, ListingId, ListingPatch, SearchFilters, SearchParams,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_listing_id};

use super::listings_dto::{ListingPage, ListingPatchRequest, ListingRequest, ListingResponse};

#[derive(Debug, Deserialize)]
pub struct ListingPath {
    id: String,
}

impl ListingPath {
    fn listing_id(&self) -> Result<ListingId, Error> {
        parse_listing_id(&self.id, FieldName::new("id"))
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    filename: Option<String>,
}

/// Normalise raw query parameters and run the public search.
pub(crate) async fn run_search(state: &HttpState, params: SearchParams) -> ApiResult<ListingPage> {
    let filters = SearchFilters::try_from(params)?;
    let page = state.listings.search(filters).await?;
    Ok(ListingPage::from(page))
}

/// Search active listings.
#[utoipa::path(
    get,
    path = "/api/v1/properties",
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
    tags = ["properties"],
    operation_id = "listProperties",
    security([])
)]
#[get("/properties")]
pub async fn list_properties(
    state: web::Data<HttpState>,
    query: web::Query<SearchParams>,
) -> ApiResult<web::Json<ListingPage>> {
    run_search(&state, query.into_inner()).await.map(web::Json)
}

/// Fetch one listing.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "The listing", body = ListingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "getProperty",
    security([])
)]
#[get("/properties/{id}")]
pub async fn get_property(
    state: web::Data<HttpState>,
    path: web::Path<ListingPath>,
) -> ApiResult<web::Json<ListingResponse>> {
    let id = path.listing_id()?;
    let listing = state.listings.get(&id).await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

/// Create a listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    request_body = ListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Buyers cannot create listings", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "createProperty"
)]
#[post("/properties")]
pub async fn create_property(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ListingRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.actor(&session).await?;
    let details = ListingDetails::try_from(payload.into_inner())?;
    let listing = state.listings_command.create(&actor, details).await?;
    info!(listing_id = %listing.id(), owner_id = %actor.user_id, "listing created");
    Ok(HttpResponse::Created().json(ListingResponse::from(listing)))
}

/// Update a listing. Only the owner or an admin may do so.
#[utoipa::path(
    put,
    path = "/api/v1/properties/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = ListingPatchRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "updateProperty"
)]
#[put("/properties/{id}")]
pub async fn update_property(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListingPath>,
    payload: web::Json<ListingPatchRequest>,
) -> ApiResult<web::Json<ListingResponse>> {
    let id = path.listing_id()?;
    let actor = state.actor(&session).await?;
    let patch = ListingPatch::try_from(payload.into_inner())?;
    let listing = state.listings_command.update(&actor, &id, patch).await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

/// Delete a listing and its stored images.
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "deleteProperty"
)]
#[delete("/properties/{id}")]
pub async fn delete_property(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListingPath>,
) -> ApiResult<HttpResponse> {
    let id = path.listing_id()?;
    let actor = state.actor(&session).await?;
    state.listings_command.delete(&actor, &id).await?;
    info!(listing_id = %id, "listing deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Attach an image to a listing.
///
/// The request body is the raw image; `filename` supplies the extension.
#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/images",
    params(
        ("id" = String, Path, description = "Listing identifier"),
        ("filename" = String, Query, description = "Original file name; jpeg, jpg, png, gif or webp")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Listing with the new image URL", body = ListingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["properties"],
    operation_id = "uploadPropertyImage"
)]
#[post("/properties/{id}/images")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListingPath>,
    query: web::Query<ImageQuery>,
    body: web::Bytes,
) -> ApiResult<web::Json<ListingResponse>> {
    let id = path.listing_id()?;
    let actor = state.actor(&session).await?;
    let filename = query
        .into_inner()
        .filename
        .ok_or_else(|| missing_field_error(FieldName::new("filename")))?;
    let upload = ImageUpload::from_filename(id, &filename, body.to_vec())?;
    let listing = state
        .listings_command
        .add_images(&actor, &id, vec![upload])
        .await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
