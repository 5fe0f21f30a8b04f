//! Administration HTTP handlers.
//!
//! ```text
//! GET /api/v1/admin/dashboard
//! GET /api/v1/admin/users?role=SELLER&search=ada&page=1&limit=20
//! PUT /api/v1/admin/users/{id}/role {"role":"AGENT"}
//! GET /api/v1/admin/properties?status=INACTIVE&propertyType=LAND
//! PUT /api/v1/admin/properties/{id}/status {"status":"SOLD"}
//! DELETE /api/v1/admin/properties/{id}
//! GET /api/v1/admin/reports?type=users&startDate=2024-01-01&endDate=2024-01-31
//! ```
//!
//! The caller's role is re-read on every request, so a demoted admin loses
//! access immediately.

use actix_web::{HttpResponse, delete, get, put, web};
use pagination::{DEFAULT_LIMIT, Paginated, PaginationEnvelope};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UserFilter;
use crate::domain::search::present;
use crate::domain::{
    ApiResult, DashboardStats, DateRange, Error, ListingQuery, ListingStatus, PropertyType,
    Report, ReportKind, Role, User, parse_page_request,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_choice_error, missing_field_error, parse_listing_id, parse_optional_enum,
    parse_required_enum, parse_user_id,
};

use super::auth::UserResponse;
use super::listings_dto::{ListingPage, ListingResponse, PaginationSchema};

/// Default page size for the admin user list.
pub const USER_PAGE_LIMIT: u32 = 20;

const ROLE_CHOICES: &str = "BUYER SELLER AGENT ADMIN";

#[derive(Debug, Deserialize)]
pub struct IdPath {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    role: Option<String>,
    search: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingModerationQuery {
    status: Option<String>,
    property_type: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RoleChangeRequest {
    #[schema(example = "AGENT")]
    pub role: Option<String>,
}

/// Body for `PUT /admin/properties/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusChangeRequest {
    #[schema(example = "SOLD")]
    pub status: Option<String>,
}

/// A page of accounts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserPage {
    pub users: Vec<UserResponse>,
    #[schema(value_type = PaginationSchema)]
    pub pagination: PaginationEnvelope,
}

impl From<Paginated<User>> for UserPage {
    fn from(page: Paginated<User>) -> Self {
        let Paginated { items, pagination } = page;
        Self {
            users: items.iter().map(UserResponse::from).collect(),
            pagination,
        }
    }
}

fn parse_role(raw: Option<String>) -> Result<Option<Role>, Error> {
    present(raw)
        .map(|value| {
            value
                .parse::<Role>()
                .map_err(|_| invalid_choice_error(FieldName::new("role"), &value, ROLE_CHOICES))
        })
        .transpose()
}

/// Headline counts and recent activity.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = serde_json::Value),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardStats>> {
    let actor = state.actor(&session).await?;
    state.admin.dashboard(&actor).await.map(web::Json)
}

/// List accounts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(
        ("role" = Option<String>, Query, description = "BUYER, SELLER, AGENT or ADMIN"),
        ("search" = Option<String>, Query, description = "Case-insensitive name or email substring"),
        ("page" = Option<String>, Query, description = "Page number, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 20, max 100")
    ),
    responses(
        (status = 200, description = "Accounts", body = UserPage),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UserListQuery>,
) -> ApiResult<web::Json<UserPage>> {
    let actor = state.actor(&session).await?;
    let UserListQuery {
        role,
        search,
        page,
        limit,
    } = query.into_inner();
    let filter = UserFilter {
        role: parse_role(role)?,
        search: present(search),
    };
    let page = parse_page_request(page, limit, USER_PAGE_LIMIT)?;
    let users = state.admin.list_users(&actor, filter, page).await?;
    Ok(web::Json(UserPage::from(users)))
}

/// Change an account's role.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/role",
    params(("id" = String, Path, description = "User identifier")),
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminChangeRole"
)]
#[put("/admin/users/{id}/role")]
pub async fn change_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<IdPath>,
    payload: web::Json<RoleChangeRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = parse_user_id(&path.id, FieldName::new("id"))?;
    let actor = state.actor(&session).await?;
    let role = parse_role(payload.into_inner().role)?
        .ok_or_else(|| missing_field_error(FieldName::new("role")))?;
    let user = state.admin_command.change_role(&actor, &user_id, role).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// List listings of any status, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/properties",
    params(
        ("status" = Option<String>, Query, description = "ACTIVE, INACTIVE, SOLD or RENTED"),
        ("propertyType" = Option<String>, Query, description = "HOUSE, APARTMENT or LAND"),
        ("page" = Option<String>, Query, description = "Page number, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 10, max 100")
    ),
    responses(
        (status = 200, description = "Listings", body = ListingPage),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListProperties"
)]
#[get("/admin/properties")]
pub async fn list_properties(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListingModerationQuery>,
) -> ApiResult<web::Json<ListingPage>> {
    let actor = state.actor(&session).await?;
    let ListingModerationQuery {
        status,
        property_type,
        page,
        limit,
    } = query.into_inner();
    let query = ListingQuery::moderation(
        parse_optional_enum::<ListingStatus>(FieldName::new("status"), status)?,
        parse_optional_enum::<PropertyType>(FieldName::new("propertyType"), property_type)?,
        parse_page_request(page, limit, DEFAULT_LIMIT)?,
    );
    let listings = state.admin.list_listings(&actor, query).await?;
    Ok(web::Json(ListingPage::from(listings)))
}

/// Move a listing to another status.
#[utoipa::path(
    put,
    path = "/api/v1/admin/properties/{id}/status",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminChangeStatus"
)]
#[put("/admin/properties/{id}/status")]
pub async fn change_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<IdPath>,
    payload: web::Json<StatusChangeRequest>,
) -> ApiResult<web::Json<ListingResponse>> {
    let listing_id = parse_listing_id(&path.id, FieldName::new("id"))?;
    let actor = state.actor(&session).await?;
    let raw = present(payload.into_inner().status)
        .ok_or_else(|| missing_field_error(FieldName::new("status")))?;
    let status: ListingStatus = parse_required_enum(FieldName::new("status"), raw)?;
    let listing = state
        .admin_command
        .change_status(&actor, &listing_id, status)
        .await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

/// Delete any listing.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/properties/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteProperty"
)]
#[delete("/admin/properties/{id}")]
pub async fn delete_property(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<IdPath>,
) -> ApiResult<HttpResponse> {
    let listing_id = parse_listing_id(&path.id, FieldName::new("id"))?;
    let actor = state.actor(&session).await?;
    state.admin_command.delete_listing(&actor, &listing_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Generate a grouped-count report.
///
/// `users` and `properties` reports partition their total by every enum
/// variant; `activity` counts creations inside the window.
#[utoipa::path(
    get,
    path = "/api/v1/admin/reports",
    params(
        ("type" = String, Query, description = "users, properties or activity"),
        ("startDate" = Option<String>, Query, description = "Inclusive RFC 3339 timestamp or YYYY-MM-DD"),
        ("endDate" = Option<String>, Query, description = "Inclusive RFC 3339 timestamp or YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Report for the requested kind", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminReport"
)]
#[get("/admin/reports")]
pub async fn report(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ReportQuery>,
) -> ApiResult<web::Json<Report>> {
    let actor = state.actor(&session).await?;
    let ReportQuery {
        kind,
        start_date,
        end_date,
    } = query.into_inner();
    let kind: ReportKind = present(kind)
        .ok_or_else(|| missing_field_error(FieldName::new("type")))?
        .parse()?;
    let range = DateRange::parse(start_date, end_date)?;
    state.admin.report(&actor, kind, range).await.map(web::Json)
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
