//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Keep types immutable and document invariants and serialisation
//! contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - User, Listing, Favorite — marketplace aggregates.
//! - SearchFilters, ListingQuery — the normalised search pipeline.
//! - Report, DashboardStats — admin aggregations.

pub mod account_service;
pub mod admin_service;
pub mod auth;
pub mod authorization;
pub mod error;
pub mod favorite;
pub mod favorites_service;
pub mod field_error;
pub mod listing;
pub mod listing_service;
pub mod paginator;
pub mod ports;
pub mod report;
pub mod search;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::admin_service::AdminService;
pub use self::auth::{
    AuthValidationError, LoginCredentials, MIN_PASSWORD_LEN, PasswordChange, Registration,
};
pub use self::authorization::{Action, Actor, Decision, authorize};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::favorite::{Favorite, FavoriteListing};
pub use self::favorites_service::FavoritesService;
pub use self::field_error::{FieldError, FieldErrorCode};
pub use self::listing::{
    AreaUnit, Listing, ListingDetails, ListingDetailsDraft, ListingDraft, ListingId,
    ListingPatch, ListingStatus, ListingType, ListingValidationError, MAX_ROOMS, PropertyType,
    UnknownVariant,
};
pub use self::listing_service::ListingService;
pub use self::paginator::paginate;
pub use self::report::{
    ActivityReport, DASHBOARD_RECENT, DashboardOverview, DashboardStats, DateRange,
    PropertiesReport, RecentListing, RecentUser, Report, ReportKind, RoleCount, StatusCount,
    TypeCount, UsersReport, role_counts, status_counts, type_counts,
};
pub use self::search::{
    ListingFilter, ListingOrder, ListingQuery, LocationCount, SearchFilters, SearchParams,
    parse_page_request,
};
pub use self::trace_id::TraceId;
pub use self::user::{DisplayName, Email, Role, User, UserDraft, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use realestatehub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
