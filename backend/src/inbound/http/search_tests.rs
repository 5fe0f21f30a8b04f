//! Tests for search handlers.

use super::*;
use crate::domain::{ListingStatus, ListingType, PropertyType, UserId};
use crate::inbound::http::test_utils::TestContext;
use crate::test_support::{ListingFixture, days_after_epoch};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn context() -> TestContext {
    TestContext::new()
}

async fn seed_mixed(context: &TestContext) {
    let owner = UserId::random();
    for (day, price) in [(1, "2000000"), (2, "5000000"), (3, "3500000")] {
        context
            .seed_listing(
                ListingFixture::new(owner)
                    .priced(price)
                    .created(days_after_epoch(day))
                    .build(),
            )
            .await;
    }
    context
        .seed_listing(
            ListingFixture::new(owner)
                .located("Abuja", "Maitama")
                .typed(PropertyType::House, ListingType::Rent)
                .build(),
        )
        .await;
    context
        .seed_listing(
            ListingFixture::new(owner)
                .status(ListingStatus::Inactive)
                .build(),
        )
        .await;
}

async fn get_json<S, B>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response =
        actix_test::call_service(app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    let status = response.status();
    let body = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[case("/api/v1/search")]
#[case("/api/v1/properties")]
#[actix_web::test]
async fn public_search_hides_inactive_listings(context: TestContext, #[case] uri: &str) {
    seed_mixed(&context).await;
    let app = actix_test::init_service(context.app()).await;

    let (status, body) = get_json(&app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 4);
    let statuses: Vec<&Value> = body["properties"]
        .as_array()
        .expect("properties array")
        .iter()
        .map(|listing| &listing["status"])
        .collect();
    assert!(statuses.iter().all(|status| *status == "ACTIVE"));
}

#[rstest]
#[actix_web::test]
async fn status_parameter_cannot_widen_public_search(context: TestContext) {
    seed_mixed(&context).await;
    let app = actix_test::init_service(context.app()).await;

    let (status, body) = get_json(&app, "/api/v1/search?status=INACTIVE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 4);
}

#[rstest]
#[actix_web::test]
async fn filters_sort_and_paginate(context: TestContext) {
    seed_mixed(&context).await;
    let app = actix_test::init_service(context.app()).await;

    let (status, body) = get_json(
        &app,
        "/api/v1/search?city=lekki&minPrice=2500000&sortBy=price_asc&limit=1&page=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["pages"], 2);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["properties"][0]["price"], "5000000");
}

#[rstest]
#[actix_web::test]
async fn blank_parameters_are_ignored(context: TestContext) {
    seed_mixed(&context).await;
    let app = actix_test::init_service(context.app()).await;

    let (status, body) = get_json(&app, "/api/v1/search?city=&propertyType=&minPrice=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 4);
}

#[rstest]
#[case("minPrice=abc", "minPrice")]
#[case("propertyType=CASTLE", "propertyType")]
#[case("limit=101", "limit")]
#[case("page=0", "page")]
#[case("minPrice=500&maxPrice=100", "minPrice")]
#[actix_web::test]
async fn invalid_parameters_name_the_field(
    context: TestContext,
    #[case] query: &str,
    #[case] field: &str,
) {
    let app = actix_test::init_service(context.app()).await;

    let (status, body) = get_json(&app, &format!("/api/v1/search?{query}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn page_past_the_end_is_empty(context: TestContext) {
    seed_mixed(&context).await;
    let app = actix_test::init_service(context.app()).await;

    let (status, body) = get_json(&app, "/api/v1/search?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"], Value::Array(Vec::new()));
    assert_eq!(body["pagination"]["total"], 4);
}

#[rstest]
#[actix_web::test]
async fn locations_and_types_count_active_listings(context: TestContext) {
    seed_mixed(&context).await;
    let app = actix_test::init_service(context.app()).await;

    let (status, places) = get_json(&app, "/api/v1/search/locations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(places[0]["city"], "Lekki");
    assert_eq!(places[0]["count"], 3);
    assert_eq!(places[1]["state"], "Abuja");

    let (status, types) = get_json(&app, "/api/v1/search/types").await;
    assert_eq!(status, StatusCode::OK);
    let total: u64 = types
        .as_array()
        .expect("types array")
        .iter()
        .filter_map(|row| row["count"].as_u64())
        .sum();
    assert_eq!(total, 4);
    assert!(
        types
            .as_array()
            .expect("types array")
            .iter()
            .any(|row| row["type"] == "HOUSE" && row["count"] == 1)
    );
}
