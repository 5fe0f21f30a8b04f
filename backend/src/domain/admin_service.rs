//! Admin services: moderation, dashboard statistics and reports.
//!
//! Every entry point checks [`Action::Administer`] first. Independent store
//! reads are joined so a dashboard or report costs one round of latency.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::{PageRequest, Paginated};
use tracing::info;

use crate::domain::listing_service::{
    load_listing, map_listing_error, remove_listing, save_listing,
};
use crate::domain::ports::{
    AdminCommand, AdminQuery, FavoritePersistenceError, FavoriteRepository, ImageStore,
    ListingRepository, UserFilter, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Action, ActivityReport, Actor, DASHBOARD_RECENT, DashboardOverview, DashboardStats,
    DateRange, Error, Listing, ListingFilter, ListingId, ListingQuery, ListingStatus,
    PropertiesReport, RecentListing, RecentUser, Report, ReportKind, Role, User, UserId,
    UsersReport, paginate, role_counts, status_counts, type_counts,
};

/// Admin service implementing the admin driving ports.
#[derive(Clone)]
pub struct AdminService<U, L, F, I> {
    users: Arc<U>,
    listings: Arc<L>,
    favorites: Arc<F>,
    images: Arc<I>,
}

impl<U, L, F, I> AdminService<U, L, F, I> {
    pub fn new(users: Arc<U>, listings: Arc<L>, favorites: Arc<F>, images: Arc<I>) -> Self {
        Self {
            users,
            listings,
            favorites,
            images,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected email conflict for {email}"))
        }
    }
}

fn map_favorite_error(error: FavoritePersistenceError) -> Error {
    match error {
        FavoritePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("favorite repository unavailable: {message}"))
        }
        other => Error::internal(format!("favorite repository error: {other}")),
    }
}

fn recent_user(user: User) -> RecentUser {
    RecentUser {
        id: *user.id(),
        name: user.name().as_ref().to_owned(),
        email: user.email().as_ref().to_owned(),
        role: user.role(),
        created_at: user.created_at(),
    }
}

fn recent_listing(listing: Listing) -> RecentListing {
    RecentListing {
        id: listing.id(),
        title: listing.details().title().to_owned(),
        price: listing.details().price().clone(),
        status: listing.status(),
        created_at: listing.created_at(),
        owner_id: *listing.owner_id(),
    }
}

impl<U, L, F, I> AdminService<U, L, F, I>
where
    U: UserRepository,
    L: ListingRepository,
    F: FavoriteRepository,
    I: ImageStore,
{
    async fn users_report(&self, range: &DateRange) -> Result<UsersReport, Error> {
        let (total_users, by_role) = tokio::try_join!(
            async { self.users.count_created(range).await.map_err(map_user_error) },
            async { self.users.count_by_role(range).await.map_err(map_user_error) },
        )?;
        Ok(UsersReport {
            total_users,
            users_by_role: role_counts(&by_role),
        })
    }

    async fn properties_report(&self, range: &DateRange) -> Result<PropertiesReport, Error> {
        let all = ListingFilter::default();
        let (total_properties, by_type, by_status) = tokio::try_join!(
            async {
                self.listings
                    .count_created(range)
                    .await
                    .map_err(map_listing_error)
            },
            async {
                self.listings
                    .count_by_type(&all, range)
                    .await
                    .map_err(map_listing_error)
            },
            async {
                self.listings
                    .count_by_status(range)
                    .await
                    .map_err(map_listing_error)
            },
        )?;
        Ok(PropertiesReport {
            total_properties,
            properties_by_type: type_counts(&by_type),
            properties_by_status: status_counts(&by_status),
        })
    }

    async fn activity_report(&self, range: &DateRange) -> Result<ActivityReport, Error> {
        let (new_users, new_properties, new_favorites) = tokio::try_join!(
            async { self.users.count_created(range).await.map_err(map_user_error) },
            async {
                self.listings
                    .count_created(range)
                    .await
                    .map_err(map_listing_error)
            },
            async {
                self.favorites
                    .count_created(range)
                    .await
                    .map_err(map_favorite_error)
            },
        )?;
        Ok(ActivityReport {
            new_users,
            new_properties,
            new_favorites,
        })
    }
}

#[async_trait]
impl<U, L, F, I> AdminQuery for AdminService<U, L, F, I>
where
    U: UserRepository,
    L: ListingRepository,
    F: FavoriteRepository,
    I: ImageStore,
{
    async fn dashboard(&self, actor: &Actor) -> Result<DashboardStats, Error> {
        actor.require(Action::Administer, None)?;
        let everything = DateRange::default();
        let all = ListingFilter::default();
        let active = ListingFilter {
            status: Some(ListingStatus::Active),
            ..ListingFilter::default()
        };

        let (
            total_users,
            total_properties,
            active_properties,
            total_favorites,
            by_role,
            by_type,
            recent_users,
            recent_properties,
        ) = tokio::try_join!(
            async {
                self.users
                    .count(&UserFilter::default())
                    .await
                    .map_err(map_user_error)
            },
            async { self.listings.count(&all).await.map_err(map_listing_error) },
            async { self.listings.count(&active).await.map_err(map_listing_error) },
            async {
                self.favorites
                    .count_created(&everything)
                    .await
                    .map_err(map_favorite_error)
            },
            async {
                self.users
                    .count_by_role(&everything)
                    .await
                    .map_err(map_user_error)
            },
            async {
                self.listings
                    .count_by_type(&all, &everything)
                    .await
                    .map_err(map_listing_error)
            },
            async {
                self.users
                    .recent(DASHBOARD_RECENT)
                    .await
                    .map_err(map_user_error)
            },
            async {
                self.listings
                    .recent(DASHBOARD_RECENT)
                    .await
                    .map_err(map_listing_error)
            },
        )?;

        Ok(DashboardStats {
            overview: DashboardOverview {
                total_users,
                total_properties,
                active_properties,
                total_favorites,
            },
            users_by_role: role_counts(&by_role),
            properties_by_type: type_counts(&by_type),
            recent_users: recent_users.into_iter().map(recent_user).collect(),
            recent_properties: recent_properties.into_iter().map(recent_listing).collect(),
        })
    }

    async fn list_users(
        &self,
        actor: &Actor,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, Error> {
        actor.require(Action::Administer, None)?;
        paginate(
            page,
            async { self.users.list(&filter, page).await.map_err(map_user_error) },
            async { self.users.count(&filter).await.map_err(map_user_error) },
        )
        .await
    }

    async fn list_listings(
        &self,
        actor: &Actor,
        query: ListingQuery,
    ) -> Result<Paginated<Listing>, Error> {
        actor.require(Action::Administer, None)?;
        paginate(
            query.page,
            async {
                self.listings
                    .fetch_page(&query)
                    .await
                    .map_err(map_listing_error)
            },
            async {
                self.listings
                    .count(&query.filter)
                    .await
                    .map_err(map_listing_error)
            },
        )
        .await
    }

    async fn report(
        &self,
        actor: &Actor,
        kind: ReportKind,
        range: DateRange,
    ) -> Result<Report, Error> {
        actor.require(Action::Administer, None)?;
        match kind {
            ReportKind::Users => self.users_report(&range).await.map(Report::Users),
            ReportKind::Properties => self.properties_report(&range).await.map(Report::Properties),
            ReportKind::Activity => self.activity_report(&range).await.map(Report::Activity),
        }
    }
}

#[async_trait]
impl<U, L, F, I> AdminCommand for AdminService<U, L, F, I>
where
    U: UserRepository,
    L: ListingRepository,
    F: FavoriteRepository,
    I: ImageStore,
{
    async fn change_role(
        &self,
        actor: &Actor,
        user_id: &UserId,
        role: Role,
    ) -> Result<User, Error> {
        actor.require(Action::Administer, None)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?
            .with_role(role);
        if !self.users.update(&user).await.map_err(map_user_error)? {
            return Err(Error::not_found("user not found"));
        }
        info!(admin_id = %actor.user_id, %user_id, %role, "user role changed");
        Ok(user)
    }

    async fn change_status(
        &self,
        actor: &Actor,
        listing_id: &ListingId,
        status: ListingStatus,
    ) -> Result<Listing, Error> {
        actor.require(Action::Administer, None)?;
        let listing = load_listing(self.listings.as_ref(), listing_id)
            .await?
            .with_status(status, Utc::now());
        save_listing(self.listings.as_ref(), &listing).await?;
        info!(admin_id = %actor.user_id, %listing_id, %status, "listing status changed");
        Ok(listing)
    }

    async fn delete_listing(&self, actor: &Actor, listing_id: &ListingId) -> Result<(), Error> {
        actor.require(Action::Administer, None)?;
        let listing = load_listing(self.listings.as_ref(), listing_id).await?;
        remove_listing(self.listings.as_ref(), self.images.as_ref(), &listing).await
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
