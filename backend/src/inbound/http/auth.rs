//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"ada@example.com","password":"password1","name":"Ada"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"password1"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/profile
//! PUT /api/v1/auth/profile {"name":"Ada Obi"}
//! POST /api/v1/auth/change-password {"currentPassword":"...","newPassword":"..."}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, AuthValidationError, DisplayName, Error, LoginCredentials, PasswordChange,
    Registration, User,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "password1")]
    pub password: String,
    #[schema(example = "Ada Obi")]
    pub name: String,
    /// `BUYER`, `SELLER` or `AGENT`; defaults to `BUYER`.
    pub role: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.password,
            &value.name,
            value.role.as_deref(),
        )
        .map_err(Error::from)
    }
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Profile update body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[schema(example = "Ada Obi")]
    pub name: String,
}

/// Password change body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Account view returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Obi")]
    pub name: String,
    #[schema(example = "BUYER")]
    pub role: String,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            name: user.name().as_ref().to_owned(),
            role: user.role().to_string(),
            email_verified: user.email_verified(),
            last_login: user.last_login(),
            created_at: user.created_at(),
        }
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(&registration).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Fetch the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "getProfile"
)]
#[get("/auth/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.profile.fetch_profile(&user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Change the signed-in account's display name.
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "updateProfile"
)]
#[put("/auth/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let name = DisplayName::new(&payload.name).map_err(AuthValidationError::from)?;
    let user = state.accounts.update_profile(&user_id, name).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Replace the signed-in account's password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised or wrong current password", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "changePassword"
)]
#[post("/auth/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let change =
        PasswordChange::try_from_parts(&payload.current_password, &payload.new_password)?;
    state.accounts.change_password(&user_id, &change).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
