//! Tests for the admin service.

use super::*;
use crate::domain::ports::{
    MockFavoriteRepository, MockImageStore, MockListingRepository, MockUserRepository,
};
use crate::domain::{ErrorCode, PropertyType, RoleCount};
use crate::test_support::{ListingFixture, user_with_role};
use rstest::{fixture, rstest};

type Service =
    AdminService<MockUserRepository, MockListingRepository, MockFavoriteRepository, MockImageStore>;

struct Mocks {
    users: MockUserRepository,
    listings: MockListingRepository,
    favorites: MockFavoriteRepository,
    images: MockImageStore,
}

impl Mocks {
    fn into_service(self) -> Service {
        AdminService::new(
            Arc::new(self.users),
            Arc::new(self.listings),
            Arc::new(self.favorites),
            Arc::new(self.images),
        )
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        users: MockUserRepository::new(),
        listings: MockListingRepository::new(),
        favorites: MockFavoriteRepository::new(),
        images: MockImageStore::new(),
    }
}

fn admin() -> Actor {
    Actor::new(UserId::random(), Role::Admin)
}

#[rstest]
#[case(Role::Buyer)]
#[case(Role::Seller)]
#[case(Role::Agent)]
#[tokio::test]
async fn non_admins_are_forbidden_before_any_read(mocks: Mocks, #[case] role: Role) {
    let service = mocks.into_service();
    let actor = Actor::new(UserId::random(), role);

    let error = service
        .report(&actor, ReportKind::Users, DateRange::default())
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);

    let error = service
        .delete_listing(&actor, &ListingId::random())
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn users_report_partitions_to_total(mut mocks: Mocks) {
    mocks.users.expect_count_created().return_once(|_| Ok(9));
    mocks
        .users
        .expect_count_by_role()
        .return_once(|_| Ok(vec![(Role::Buyer, 6), (Role::Seller, 2), (Role::Admin, 1)]));

    let report = mocks
        .into_service()
        .report(&admin(), ReportKind::Users, DateRange::default())
        .await
        .expect("report");
    let Report::Users(report) = report else {
        panic!("expected users report");
    };
    assert_eq!(report.total_users, 9);
    assert_eq!(
        report.users_by_role.iter().map(|c| c.count).sum::<u64>(),
        report.total_users
    );
    assert!(report.users_by_role.contains(&RoleCount {
        role: Role::Agent,
        count: 0
    }));
}

#[rstest]
#[tokio::test]
async fn activity_report_uses_the_range_for_every_count(mut mocks: Mocks) {
    let range = DateRange::parse(Some("2024-01-01".into()), Some("2024-01-31".into()))
        .expect("range");
    mocks
        .users
        .expect_count_created()
        .withf(move |r: &DateRange| *r == range)
        .return_once(|_| Ok(3));
    mocks
        .listings
        .expect_count_created()
        .withf(move |r: &DateRange| *r == range)
        .return_once(|_| Ok(2));
    mocks
        .favorites
        .expect_count_created()
        .withf(move |r: &DateRange| *r == range)
        .return_once(|_| Ok(7));

    let report = mocks
        .into_service()
        .report(&admin(), ReportKind::Activity, range)
        .await
        .expect("report");
    assert_eq!(
        report,
        Report::Activity(ActivityReport {
            new_users: 3,
            new_properties: 2,
            new_favorites: 7,
        })
    );
}

#[rstest]
#[tokio::test]
async fn properties_report_lists_every_type_and_status(mut mocks: Mocks) {
    mocks.listings.expect_count_created().return_once(|_| Ok(2));
    mocks
        .listings
        .expect_count_by_type()
        .return_once(|_, _| Ok(vec![(PropertyType::Land, 2)]));
    mocks
        .listings
        .expect_count_by_status()
        .return_once(|_| Ok(vec![(ListingStatus::Sold, 2)]));

    let report = mocks
        .into_service()
        .report(&admin(), ReportKind::Properties, DateRange::default())
        .await
        .expect("report");
    let Report::Properties(report) = report else {
        panic!("expected properties report");
    };
    assert_eq!(report.properties_by_type.len(), PropertyType::ALL.len());
    assert_eq!(report.properties_by_status.len(), ListingStatus::ALL.len());
}

#[rstest]
#[tokio::test]
async fn dashboard_combines_counts_and_recent_rows(mut mocks: Mocks) {
    let owner = UserId::random();
    let recent = vec![ListingFixture::new(owner).titled("Newest duplex").build()];
    mocks.users.expect_count().return_once(|_| Ok(4));
    mocks.users.expect_count_by_role().return_once(|_| Ok(vec![(Role::Buyer, 4)]));
    mocks
        .users
        .expect_recent()
        .return_once(|_| Ok(vec![user_with_role("new@example.com", Role::Buyer)]));
    mocks
        .listings
        .expect_count()
        .withf(|filter: &ListingFilter| filter.status.is_none())
        .return_once(|_| Ok(3));
    mocks
        .listings
        .expect_count()
        .withf(|filter: &ListingFilter| filter.status == Some(ListingStatus::Active))
        .return_once(|_| Ok(2));
    mocks.listings.expect_count_by_type().return_once(|_, _| Ok(Vec::new()));
    mocks.listings.expect_recent().return_once(move |_| Ok(recent));
    mocks.favorites.expect_count_created().return_once(|_| Ok(5));

    let stats = mocks.into_service().dashboard(&admin()).await.expect("stats");
    assert_eq!(
        stats.overview,
        DashboardOverview {
            total_users: 4,
            total_properties: 3,
            active_properties: 2,
            total_favorites: 5,
        }
    );
    assert_eq!(stats.recent_users[0].email, "new@example.com");
    assert_eq!(stats.recent_properties[0].title, "Newest duplex");
    assert_eq!(stats.properties_by_type.iter().map(|t| t.count).sum::<u64>(), 0);
}

#[rstest]
#[tokio::test]
async fn change_role_updates_the_user(mut mocks: Mocks) {
    let user = user_with_role("buyer@example.com", Role::Buyer);
    let id = *user.id();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    mocks
        .users
        .expect_update()
        .withf(|user: &User| user.role() == Role::Agent)
        .times(1)
        .return_once(|_| Ok(true));

    let updated = mocks
        .into_service()
        .change_role(&admin(), &id, Role::Agent)
        .await
        .expect("role changed");
    assert_eq!(updated.role(), Role::Agent);
}

#[rstest]
#[tokio::test]
async fn terminal_status_keeps_the_listing(mut mocks: Mocks) {
    let listing = ListingFixture::new(UserId::random()).build();
    let id = listing.id();
    mocks
        .listings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(listing)));
    mocks
        .listings
        .expect_update()
        .withf(|listing: &Listing| listing.status() == ListingStatus::Sold)
        .return_once(|_| Ok(true));
    mocks.listings.expect_delete().times(0);

    let updated = mocks
        .into_service()
        .change_status(&admin(), &id, ListingStatus::Sold)
        .await
        .expect("status changed");
    assert!(updated.status().is_terminal());
}

#[rstest]
#[tokio::test]
async fn list_users_pages_with_filter(mut mocks: Mocks) {
    let filter = UserFilter {
        role: Some(Role::Seller),
        search: None,
    };
    let expected = filter.clone();
    mocks
        .users
        .expect_list()
        .withf(move |f: &UserFilter, page: &PageRequest| *f == expected && page.limit() == 20)
        .return_once(|_, _| Ok(vec![user_with_role("s@example.com", Role::Seller)]));
    mocks.users.expect_count().return_once(|_| Ok(41));

    let page = mocks
        .into_service()
        .list_users(&admin(), filter, PageRequest::new(1, 20).expect("page"))
        .await
        .expect("users");
    assert_eq!(page.pagination.pages, 3);
}
