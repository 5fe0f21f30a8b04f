//! PostgreSQL-backed `ListingRepository` implementation using Diesel ORM.
//!
//! [`ListingFilter`] is applied by one macro to plain and grouped boxed
//! queries, so every count and page fetch shares exactly one predicate. Text predicates use `ILIKE` with
//! escaped patterns; every ordering ends on the primary key.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ListingPersistenceError, ListingRepository};
use crate::domain::{
    AreaUnit, DateRange, Listing, ListingDetails, ListingDetailsDraft, ListingDraft,
    ListingFilter, ListingId, ListingOrder, ListingQuery, ListingStatus, ListingType,
    LocationCount, PropertyType, UserId,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error, to_count};
use super::models::{ListingContent, ListingRow, NewListingRow};
use super::pool::{DbPool, PoolError};
use super::schema::properties;
use super::text_search::contains_pattern;

/// Diesel-backed implementation of the `ListingRepository` port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ListingPersistenceError {
    map_pool_error(error, ListingPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ListingPersistenceError {
    map_diesel_error(
        error,
        ListingPersistenceError::query,
        ListingPersistenceError::connection,
    )
}

fn corrupt(column: &str, error: impl std::fmt::Display) -> ListingPersistenceError {
    ListingPersistenceError::query(format!("invalid {column} in properties row: {error}"))
}

fn parse_column<T>(column: &str, raw: &str) -> Result<T, ListingPersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(raw).map_err(|err| corrupt(column, err))
}

pub(crate) fn row_to_listing(row: ListingRow) -> Result<Listing, ListingPersistenceError> {
    let draft = ListingDetailsDraft {
        title: row.title,
        description: row.description,
        price: row.price,
        state: row.state,
        city: row.city,
        neighborhood: row.neighborhood,
        address: row.address,
        property_type: parse_column::<PropertyType>("property_type", &row.property_type)?,
        listing_type: parse_column::<ListingType>("listing_type", &row.listing_type)?,
        bedrooms: row.bedrooms,
        bathrooms: row.bathrooms,
        area: row.area,
        area_unit: parse_column::<AreaUnit>("area_unit", &row.area_unit)?,
        contact_name: row.contact_name,
        contact_phone: row.contact_phone,
        contact_email: row.contact_email,
    };
    let details = ListingDetails::try_from(draft).map_err(|err| corrupt("details", err))?;
    Ok(Listing::from(ListingDraft {
        id: ListingId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        details,
        images: row.images,
        status: parse_column::<ListingStatus>("status", &row.status)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn rows_to_listings(rows: Vec<ListingRow>) -> Result<Vec<Listing>, ListingPersistenceError> {
    rows.into_iter().map(row_to_listing).collect()
}

fn content(listing: &Listing) -> ListingContent<'_> {
    let details = listing.details();
    ListingContent {
        title: details.title(),
        description: details.description(),
        price: details.price(),
        state: details.state(),
        city: details.city(),
        neighborhood: details.neighborhood(),
        address: details.address(),
        property_type: details.property_type().as_str(),
        listing_type: details.listing_type().as_str(),
        bedrooms: details.bedrooms(),
        bathrooms: details.bathrooms(),
        area: details.area(),
        area_unit: details.area_unit().as_str(),
        images: listing.images(),
        contact_name: details.contact_name(),
        contact_phone: details.contact_phone(),
        contact_email: details.contact_email().as_ref(),
        status: listing.status().as_str(),
        updated_at: listing.updated_at(),
    }
}

/// Narrow any boxed `properties` query by the listing predicate.
///
/// Works on plain and grouped boxed statements alike; Diesel cannot add a
/// `GROUP BY` once a statement is boxed, so grouped counts box after
/// grouping and then narrow.
macro_rules! narrow_by_filter {
    ($query:expr, $filter:expr) => {{
        let filter: &ListingFilter = $filter;
        let mut query = $query;
        if let Some(status) = filter.status {
            query = query.filter(properties::status.eq(status.as_str()));
        }
        if let Some(text) = filter.text.as_deref() {
            let pattern = contains_pattern(text);
            query = query.filter(
                properties::title
                    .ilike(pattern.clone())
                    .or(properties::description.ilike(pattern.clone()))
                    .or(properties::address.ilike(pattern)),
            );
        }
        if let Some(state) = filter.state.as_deref() {
            query = query.filter(properties::state.ilike(contains_pattern(state)));
        }
        if let Some(city) = filter.city.as_deref() {
            query = query.filter(properties::city.ilike(contains_pattern(city)));
        }
        if let Some(kind) = filter.property_type {
            query = query.filter(properties::property_type.eq(kind.as_str()));
        }
        if let Some(kind) = filter.listing_type {
            query = query.filter(properties::listing_type.eq(kind.as_str()));
        }
        if let Some(bedrooms) = filter.bedrooms {
            query = query.filter(properties::bedrooms.eq(bedrooms));
        }
        if let Some(bathrooms) = filter.bathrooms {
            query = query.filter(properties::bathrooms.eq(bathrooms));
        }
        if let Some(min) = filter.min_price.clone() {
            query = query.filter(properties::price.ge(min));
        }
        if let Some(max) = filter.max_price.clone() {
            query = query.filter(properties::price.le(max));
        }
        query
    }};
}

/// Narrow any boxed `properties` query to rows created inside `range`.
macro_rules! narrow_by_range {
    ($query:expr, $range:expr) => {{
        let range: &DateRange = $range;
        let mut query = $query;
        if let Some(start) = range.start {
            query = query.filter(properties::created_at.ge(start));
        }
        if let Some(end) = range.end {
            query = query.filter(properties::created_at.le(end));
        }
        query
    }};
}

/// Translate the predicate into a boxed query over `properties`.
fn filtered(filter: &ListingFilter) -> properties::BoxedQuery<'static, Pg> {
    narrow_by_filter!(properties::table.into_boxed(), filter)
}

fn ordered(
    query: properties::BoxedQuery<'static, Pg>,
    order: ListingOrder,
) -> properties::BoxedQuery<'static, Pg> {
    match order {
        ListingOrder::Newest => query.order((properties::created_at.desc(), properties::id.asc())),
        ListingOrder::PriceAsc => query.order((properties::price.asc(), properties::id.asc())),
        ListingOrder::PriceDesc => query.order((properties::price.desc(), properties::id.asc())),
    }
}

fn parse_counts<T>(
    column: &str,
    rows: Vec<(String, i64)>,
) -> Result<Vec<(T, u64)>, ListingPersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    rows.into_iter()
        .map(|(raw, count)| Ok((parse_column::<T>(column, &raw)?, to_count(count))))
        .collect()
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewListingRow {
            id: *listing.id().as_uuid(),
            owner_id: *listing.owner_id().as_uuid(),
            content: content(listing),
            created_at: listing.created_at(),
        };

        diesel::insert_into(properties::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(properties::table.find(listing.id().as_uuid()))
            .set(&content(listing))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(properties::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        properties::table
            .find(id.as_uuid())
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_listing)
            .transpose()
    }

    async fn fetch_page(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let offset = i64::try_from(query.page.offset()).unwrap_or(i64::MAX);
        let rows = ordered(filtered(&query.filter), query.order)
            .offset(offset)
            .limit(i64::from(query.page.limit()))
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_listings(rows)
    }

    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        filtered(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(to_count)
            .map_err(diesel_error)
    }

    async fn count_created(&self, range: &DateRange) -> Result<u64, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        narrow_by_range!(properties::table.into_boxed::<Pg>(), range)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(to_count)
            .map_err(diesel_error)
    }

    async fn count_by_type(
        &self,
        filter: &ListingFilter,
        range: &DateRange,
    ) -> Result<Vec<(PropertyType, u64)>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let grouped = properties::table
            .group_by(properties::property_type)
            .select((properties::property_type, count_star()))
            .into_boxed::<Pg>();
        let rows: Vec<(String, i64)> = narrow_by_range!(narrow_by_filter!(grouped, filter), range)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        parse_counts("property_type", rows)
    }

    async fn count_by_status(
        &self,
        range: &DateRange,
    ) -> Result<Vec<(ListingStatus, u64)>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let grouped = properties::table
            .group_by(properties::status)
            .select((properties::status, count_star()))
            .into_boxed::<Pg>();
        let rows: Vec<(String, i64)> = narrow_by_range!(grouped, range)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        parse_counts("status", rows)
    }

    async fn count_by_location(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<LocationCount>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let grouped = properties::table
            .group_by((properties::state, properties::city))
            .select((properties::state, properties::city, count_star()))
            .into_boxed::<Pg>();
        let rows: Vec<(String, String, i64)> = narrow_by_filter!(grouped, filter)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let mut locations: Vec<LocationCount> = rows
            .into_iter()
            .map(|(state, city, count)| LocationCount {
                state,
                city,
                count: to_count(count),
            })
            .collect();
        locations.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.state.cmp(&b.state))
                .then_with(|| a.city.cmp(&b.city))
        });
        Ok(locations)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = properties::table
            .order((properties::created_at.desc(), properties::id.asc()))
            .limit(i64::from(limit))
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_listings(rows)
    }
}
