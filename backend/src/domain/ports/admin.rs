//! Driving ports for the administration console.
//!
//! Implementations reject non-admin actors with `forbidden` before doing
//! any work.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{
    Actor, DashboardStats, DateRange, Error, Listing, ListingId, ListingQuery, ListingStatus,
    Report, ReportKind, Role, User, UserId,
};

use super::UserFilter;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminQuery: Send + Sync {
    async fn dashboard(&self, actor: &Actor) -> Result<DashboardStats, Error>;

    async fn list_users(
        &self,
        actor: &Actor,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, Error>;

    async fn list_listings(
        &self,
        actor: &Actor,
        query: ListingQuery,
    ) -> Result<Paginated<Listing>, Error>;

    async fn report(
        &self,
        actor: &Actor,
        kind: ReportKind,
        range: DateRange,
    ) -> Result<Report, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    async fn change_role(&self, actor: &Actor, user_id: &UserId, role: Role)
    -> Result<User, Error>;

    async fn change_status(
        &self,
        actor: &Actor,
        listing_id: &ListingId,
        status: ListingStatus,
    ) -> Result<Listing, Error>;

    async fn delete_listing(&self, actor: &Actor, listing_id: &ListingId) -> Result<(), Error>;
}
