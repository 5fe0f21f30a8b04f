//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Repositories convert them to and from
//! domain types, revalidating anything read back from the database.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{favorites, properties, users};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating existing user records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub password_hash: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Listing models
// ---------------------------------------------------------------------------

/// Row struct for reading from the properties table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = properties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub state: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub address: String,
    pub property_type: String,
    pub listing_type: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: BigDecimal,
    pub area_unit: String,
    pub images: Vec<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values shared by inserts and updates of a listing.
///
/// Used directly as the update changeset; `None` clears the column.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = properties)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ListingContent<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub price: &'a BigDecimal,
    pub state: &'a str,
    pub city: &'a str,
    pub neighborhood: Option<&'a str>,
    pub address: &'a str,
    pub property_type: &'a str,
    pub listing_type: &'a str,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: &'a BigDecimal,
    pub area_unit: &'a str,
    pub images: &'a [String],
    pub contact_name: &'a str,
    pub contact_phone: &'a str,
    pub contact_email: &'a str,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new listing records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = properties)]
pub(crate) struct NewListingRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[diesel(embed)]
    pub content: ListingContent<'a>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Favorite models
// ---------------------------------------------------------------------------

/// Insertable struct for favorite records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct NewFavoriteRow {
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub created_at: DateTime<Utc>,
}
