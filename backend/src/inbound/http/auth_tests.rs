//! Tests for account handlers, run against the in-memory adapters.

use super::*;
use crate::domain::Role;
use crate::inbound::http::test_utils::{SEED_PASSWORD, TestContext, login_cookie};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn context() -> TestContext {
    TestContext::new()
}

#[rstest]
#[actix_web::test]
async fn register_creates_a_buyer_and_signs_in(context: TestContext) {
    let app = actix_test::init_service(context.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": "Ada@Example.com",
                "password": "password1",
                "name": "Ada Obi"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    let body: UserResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.email, "ada@example.com");
    assert_eq!(body.role, "BUYER");

    let profile = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(profile.status(), StatusCode::OK);
    let profile: UserResponse = actix_test::read_body_json(profile).await;
    assert_eq!(profile.id, body.id);
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_conflicts(context: TestContext) {
    context.seed_user("ada@example.com", Role::Seller).await;
    let app = actix_test::init_service(context.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": "ada@example.com",
                "password": "password1",
                "name": "Ada Again"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[case(json!({"email": "ada@example.com", "password": "short", "name": "Ada"}), "password")]
#[case(json!({"email": "ada@example.com", "password": "password1", "name": "Ada", "role": "ADMIN"}), "role")]
#[case(json!({"email": "not-an-email", "password": "password1", "name": "Ada"}), "email")]
#[actix_web::test]
async fn invalid_registrations_name_the_field(
    context: TestContext,
    #[case] payload: Value,
    #[case] field: &str,
) {
    let app = actix_test::init_service(context.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_unauthorised(context: TestContext) {
    context.seed_user("ada@example.com", Role::Buyer).await;
    let app = actix_test::init_service(context.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": "wrong-password"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn profile_requires_a_session(context: TestContext) {
    let app = actix_test::init_service(context.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/profile")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn login_records_last_login_and_profile_updates_name(context: TestContext) {
    context.seed_user("ada@example.com", Role::Buyer).await;
    let app = actix_test::init_service(context.app()).await;
    let cookie = login_cookie(&app, "ada@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/auth/profile")
            .cookie(cookie)
            .set_json(json!({"name": "Ada Obi"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: UserResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.name, "Ada Obi");
    assert!(body.last_login.is_some());
}

#[rstest]
#[actix_web::test]
async fn change_password_checks_the_current_one(context: TestContext) {
    context.seed_user("ada@example.com", Role::Buyer).await;
    let app = actix_test::init_service(context.app()).await;
    let cookie = login_cookie(&app, "ada@example.com").await;

    let wrong = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/change-password")
            .cookie(cookie.clone())
            .set_json(json!({"currentPassword": "not-it", "newPassword": "new-password"}))
            .to_request(),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let changed = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/change-password")
            .cookie(cookie)
            .set_json(json!({"currentPassword": SEED_PASSWORD, "newPassword": "new-password"}))
            .to_request(),
    )
    .await;
    assert_eq!(changed.status(), StatusCode::NO_CONTENT);

    let old_login = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": SEED_PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session(context: TestContext) {
    context.seed_user("ada@example.com", Role::Buyer).await;
    let app = actix_test::init_service(context.app()).await;
    let cookie = login_cookie(&app, "ada@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let removal = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie")
        .into_owned();

    let profile = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/profile")
            .cookie(removal)
            .to_request(),
    )
    .await;
    assert_eq!(profile.status(), StatusCode::UNAUTHORIZED);
}
