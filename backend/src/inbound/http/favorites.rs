//! Favorites HTTP handlers.
//!
//! ```text
//! GET /api/v1/favorites
//! POST /api/v1/favorites/{listingId}
//! DELETE /api/v1/favorites/{listingId}
//! GET /api/v1/favorites/{listingId}/check
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, Error, Favorite, FavoriteListing, ListingId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_listing_id};

use super::listings_dto::ListingResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePath {
    listing_id: String,
}

impl FavoritePath {
    fn listing_id(&self) -> Result<ListingId, Error> {
        parse_listing_id(&self.listing_id, FieldName::new("listingId"))
    }
}

/// A saved listing with the time it was saved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteListingBody {
    pub listing: ListingResponse,
    pub favorited_at: DateTime<Utc>,
}

impl From<FavoriteListing> for FavoriteListingBody {
    fn from(value: FavoriteListing) -> Self {
        Self {
            listing: ListingResponse::from(value.listing),
            favorited_at: value.favorited_at,
        }
    }
}

/// A newly created favorite.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBody {
    pub listing_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteBody {
    fn from(value: Favorite) -> Self {
        Self {
            listing_id: value.listing_id.to_string(),
            created_at: value.created_at,
        }
    }
}

/// Whether the caller has saved a listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheckBody {
    pub is_favorite: bool,
}

/// List the caller's saved listings, most recently saved first.
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    responses(
        (status = 200, description = "Saved listings", body = [FavoriteListingBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites"
)]
#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<FavoriteListingBody>>> {
    let user_id = session.require_user_id()?;
    let favorites = state.favorites_query.list(&user_id).await?;
    Ok(web::Json(
        favorites
            .into_iter()
            .map(FavoriteListingBody::from)
            .collect(),
    ))
}

/// Save a listing.
#[utoipa::path(
    post,
    path = "/api/v1/favorites/{listingId}",
    params(("listingId" = String, Path, description = "Listing identifier")),
    responses(
        (status = 201, description = "Favorite created", body = FavoriteBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Listing not found", body = ErrorSchema),
        (status = 409, description = "Already saved", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/favorites/{listingId}")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FavoritePath>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let listing_id = path.listing_id()?;
    let favorite = state.favorites.add(&user_id, &listing_id).await?;
    Ok(HttpResponse::Created().json(FavoriteBody::from(favorite)))
}

/// Forget a saved listing.
#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{listingId}",
    params(("listingId" = String, Path, description = "Listing identifier")),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not saved", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/favorites/{listingId}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FavoritePath>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let listing_id = path.listing_id()?;
    state.favorites.remove(&user_id, &listing_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1/favorites/{listingId}/check",
    params(("listingId" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Saved state", body = FavoriteCheckBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "checkFavorite"
)]
#[get("/favorites/{listingId}/check")]
pub async fn check_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FavoritePath>,
) -> ApiResult<web::Json<FavoriteCheckBody>> {
    let user_id = session.require_user_id()?;
    let listing_id = path.listing_id()?;
    let is_favorite = state
        .favorites_query
        .is_favorite(&user_id, &listing_id)
        .await?;
    Ok(web::Json(FavoriteCheckBody { is_favorite }))
}
