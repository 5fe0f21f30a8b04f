//! Tests for the listing service.

use super::*;
use crate::domain::ports::{MockImageStore, MockListingRepository};
use crate::domain::{ErrorCode, ListingOrder, Role, SearchParams, UserId};
use crate::test_support::{ListingFixture, decimal, details, details_draft};
use mockall::predicate::eq;
use rstest::rstest;

fn service(
    repo: MockListingRepository,
    images: MockImageStore,
) -> ListingService<MockListingRepository, MockImageStore> {
    ListingService::new(Arc::new(repo), Arc::new(images))
}

fn actor(role: Role) -> Actor {
    Actor::new(UserId::random(), role)
}

fn filters(params: SearchParams) -> SearchFilters {
    SearchFilters::try_from(params).expect("valid filters")
}

#[rstest]
#[tokio::test]
async fn search_forces_active_status_and_pages() {
    let owner = UserId::random();
    let listing = ListingFixture::new(owner).build();
    let mut repo = MockListingRepository::new();
    repo.expect_fetch_page()
        .withf(|query: &ListingQuery| {
            query.filter.status == Some(ListingStatus::Active)
                && query.order == ListingOrder::PriceDesc
                && query.page.offset() == 10
        })
        .times(1)
        .return_once(move |_| Ok(vec![listing]));
    repo.expect_count()
        .withf(|filter: &ListingFilter| filter.status == Some(ListingStatus::Active))
        .times(1)
        .return_once(|_| Ok(11));

    let page = service(repo, MockImageStore::new())
        .search(filters(SearchParams {
            sort_by: Some("price_desc".into()),
            page: Some("2".into()),
            ..SearchParams::default()
        }))
        .await
        .expect("search succeeds");

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.pagination.total, 11);
    assert_eq!(page.pagination.pages, 2);
}

#[rstest]
#[tokio::test]
async fn search_surfaces_store_outage() {
    let mut repo = MockListingRepository::new();
    repo.expect_fetch_page().returning(|_| Ok(Vec::new()));
    repo.expect_count()
        .returning(|_| Err(ListingPersistenceError::connection("pool exhausted")));

    let error = service(repo, MockImageStore::new())
        .search(filters(SearchParams::default()))
        .await
        .expect_err("count failed");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn property_types_include_zero_counts() {
    let mut repo = MockListingRepository::new();
    repo.expect_count_by_type()
        .return_once(|_, _| Ok(vec![(crate::domain::PropertyType::House, 4)]));

    let types = service(repo, MockImageStore::new())
        .property_types()
        .await
        .expect("types");
    assert_eq!(types.len(), 3);
    assert_eq!(types.iter().map(|t| t.count).sum::<u64>(), 4);
}

#[rstest]
#[case(Role::Seller)]
#[case(Role::Agent)]
#[tokio::test]
async fn sellers_and_agents_create_active_listings(#[case] role: Role) {
    let creator = actor(role);
    let mut repo = MockListingRepository::new();
    repo.expect_insert().times(1).return_once(|_| Ok(()));

    let listing = service(repo, MockImageStore::new())
        .create(&creator, details(details_draft()))
        .await
        .expect("create succeeds");
    assert_eq!(listing.status(), ListingStatus::Active);
    assert_eq!(listing.owner_id(), &creator.user_id);
    assert!(listing.images().is_empty());
}

#[rstest]
#[tokio::test]
async fn buyers_cannot_create_listings() {
    let mut repo = MockListingRepository::new();
    repo.expect_insert().times(0);

    let error = service(repo, MockImageStore::new())
        .create(&actor(Role::Buyer), details(details_draft()))
        .await
        .expect_err("buyers are forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_by_non_owner_is_forbidden_without_writing() {
    let listing = ListingFixture::new(UserId::random()).build();
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .with(eq(id))
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_update().times(0);

    let error = service(repo, MockImageStore::new())
        .update(&actor(Role::Seller), &id, ListingPatch::default())
        .await
        .expect_err("not the owner");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_may_update_any_listing() {
    let listing = ListingFixture::new(UserId::random()).build();
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_update().times(1).return_once(|_| Ok(true));

    let updated = service(repo, MockImageStore::new())
        .update(
            &actor(Role::Admin),
            &id,
            ListingPatch {
                price: Some(decimal("4000000")),
                ..ListingPatch::default()
            },
        )
        .await
        .expect("admin bypasses ownership");
    assert_eq!(updated.details().price(), &decimal("4000000"));
}

#[rstest]
#[case(ListingStatus::Sold)]
#[case(ListingStatus::Rented)]
#[case(ListingStatus::Inactive)]
#[tokio::test]
async fn owner_may_change_status(#[case] status: ListingStatus) {
    let owner = actor(Role::Seller);
    let listing = ListingFixture::new(owner.user_id).build();
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_update()
        .withf(move |stored: &Listing| stored.status() == status)
        .times(1)
        .return_once(|_| Ok(true));

    let updated = service(repo, MockImageStore::new())
        .update(
            &owner,
            &id,
            ListingPatch {
                status: Some(status),
                ..ListingPatch::default()
            },
        )
        .await
        .expect("owner closes listing");
    assert_eq!(updated.status(), status);
    assert_eq!(updated.details().price(), &decimal("3500000"));
}

#[rstest]
#[tokio::test]
async fn update_revalidates_merged_details() {
    let owner = actor(Role::Seller);
    let listing = ListingFixture::new(owner.user_id).build();
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_update().times(0);

    let error = service(repo, MockImageStore::new())
        .update(
            &owner,
            &id,
            ListingPatch {
                price: Some(decimal("0")),
                ..ListingPatch::default()
            },
        )
        .await
        .expect_err("zero price");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn delete_cleans_up_images_and_tolerates_failures() {
    let owner = actor(Role::Agent);
    let listing = ListingFixture::new(owner.user_id)
        .build()
        .with_images_appended(
            ["https://img/a.png".to_owned(), "https://img/b.png".to_owned()],
            crate::test_support::epoch(),
        );
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_delete().times(1).return_once(|_| Ok(true));
    let mut images = MockImageStore::new();
    images
        .expect_delete()
        .withf(|url: &str| url == "https://img/a.png")
        .times(1)
        .return_once(|_| Err(ImageStoreError::storage("gone")));
    images
        .expect_delete()
        .withf(|url: &str| url == "https://img/b.png")
        .times(1)
        .return_once(|_| Ok(()));

    service(repo, images)
        .delete(&owner, &id)
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn missing_listing_is_not_found() {
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(repo, MockImageStore::new())
        .delete(&actor(Role::Admin), &ListingId::random())
        .await
        .expect_err("absent");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn add_images_appends_in_upload_order() {
    let owner = actor(Role::Seller);
    let listing = ListingFixture::new(owner.user_id).build();
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_update().times(1).return_once(|_| Ok(true));
    let mut images = MockImageStore::new();
    images
        .expect_store()
        .returning(|upload: &ImageUpload| Ok(format!("https://img/{}", upload.extension)));

    let uploads = vec![
        ImageUpload::from_filename(id, "front.png", vec![1]).expect("upload"),
        ImageUpload::from_filename(id, "back.jpg", vec![2]).expect("upload"),
    ];
    let updated = service(repo, images)
        .add_images(&owner, &id, uploads)
        .await
        .expect("images stored");
    assert_eq!(
        updated.images(),
        &["https://img/png".to_owned(), "https://img/jpg".to_owned()]
    );
}

#[rstest]
#[tokio::test]
async fn add_images_rolls_back_on_storage_failure() {
    let owner = actor(Role::Seller);
    let listing = ListingFixture::new(owner.user_id).build();
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_update().times(0);
    let mut images = MockImageStore::new();
    let mut calls = 0;
    images.expect_store().returning(move |_| {
        calls += 1;
        if calls == 1 {
            Ok("https://img/first.png".to_owned())
        } else {
            Err(ImageStoreError::unavailable("disk offline"))
        }
    });
    images
        .expect_delete()
        .withf(|url: &str| url == "https://img/first.png")
        .times(1)
        .return_once(|_| Ok(()));

    let uploads = vec![
        ImageUpload::from_filename(id, "a.png", vec![1]).expect("upload"),
        ImageUpload::from_filename(id, "b.png", vec![2]).expect("upload"),
    ];
    let error = service(repo, images)
        .add_images(&owner, &id, uploads)
        .await
        .expect_err("second store fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn add_images_discards_uploads_when_the_save_fails() {
    let owner = actor(Role::Seller);
    let listing = ListingFixture::new(owner.user_id).build();
    let id = listing.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    repo.expect_update()
        .times(1)
        .return_once(|_| Err(ListingPersistenceError::query("write failed")));
    let mut images = MockImageStore::new();
    images
        .expect_store()
        .returning(|upload: &ImageUpload| Ok(format!("https://img/{}", upload.extension)));
    images
        .expect_delete()
        .withf(|url: &str| url == "https://img/png" || url == "https://img/jpg")
        .times(2)
        .returning(|_| Ok(()));

    let uploads = vec![
        ImageUpload::from_filename(id, "front.png", vec![1]).expect("upload"),
        ImageUpload::from_filename(id, "back.jpg", vec![2]).expect("upload"),
    ];
    let error = service(repo, images)
        .add_images(&owner, &id, uploads)
        .await
        .expect_err("save fails");
    assert_eq!(error.code(), ErrorCode::InternalError);
}
