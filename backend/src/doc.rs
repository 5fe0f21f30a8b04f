//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every endpoint under `/api/v1` plus the health checks
//! - **Schemas**: request and response bodies, and wrappers such as
//!   [`ErrorSchema`] that document domain types without coupling them to
//!   utoipa
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::admin::{RoleChangeRequest, StatusChangeRequest, UserPage};
use crate::inbound::http::auth::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, UserResponse,
};
use crate::inbound::http::favorites::{FavoriteBody, FavoriteCheckBody, FavoriteListingBody};
use crate::inbound::http::listings_dto::{
    ListingPage, ListingPatchRequest, ListingRequest, ListingResponse, PaginationSchema,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::search::{LocationCountBody, TypeCountBody};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "RealEstateHub API",
        description = "Property listings, search, favourites and administration.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::get_profile,
        crate::inbound::http::auth::update_profile,
        crate::inbound::http::auth::change_password,
        crate::inbound::http::listings::list_properties,
        crate::inbound::http::listings::get_property,
        crate::inbound::http::listings::create_property,
        crate::inbound::http::listings::update_property,
        crate::inbound::http::listings::delete_property,
        crate::inbound::http::listings::upload_image,
        crate::inbound::http::search::search,
        crate::inbound::http::search::locations,
        crate::inbound::http::search::property_types,
        crate::inbound::http::favorites::list_favorites,
        crate::inbound::http::favorites::add_favorite,
        crate::inbound::http::favorites::remove_favorite,
        crate::inbound::http::favorites::check_favorite,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::change_role,
        crate::inbound::http::admin::list_properties,
        crate::inbound::http::admin::change_status,
        crate::inbound::http::admin::delete_property,
        crate::inbound::http::admin::report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserResponse,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        ChangePasswordRequest,
        ListingResponse,
        ListingPage,
        PaginationSchema,
        ListingRequest,
        ListingPatchRequest,
        LocationCountBody,
        TypeCountBody,
        FavoriteListingBody,
        FavoriteBody,
        FavoriteCheckBody,
        UserPage,
        RoleChangeRequest,
        StatusChangeRequest,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and profile management"),
        (name = "properties", description = "Listing lifecycle and images"),
        (name = "search", description = "Public search over active listings"),
        (name = "favorites", description = "Saved listings for the signed-in user"),
        (name = "admin", description = "Moderation, dashboards and reports"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
