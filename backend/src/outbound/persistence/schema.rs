//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Enum columns
//! are stored as their upper-case wire spelling in `varchar` columns.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        name -> Varchar,
        /// BUYER, SELLER, AGENT or ADMIN.
        role -> Varchar,
        email_verified -> Bool,
        last_login -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Marketplace listings.
    properties (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        price -> Numeric,
        state -> Varchar,
        city -> Varchar,
        neighborhood -> Nullable<Varchar>,
        address -> Text,
        property_type -> Varchar,
        listing_type -> Varchar,
        bedrooms -> Nullable<Int4>,
        bathrooms -> Nullable<Int4>,
        area -> Numeric,
        area_unit -> Varchar,
        /// Public image URLs in upload order.
        images -> Array<Text>,
        contact_name -> Varchar,
        contact_phone -> Varchar,
        contact_email -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Saved listings; one row per (user, property) pair.
    favorites (user_id, property_id) {
        user_id -> Uuid,
        property_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(properties -> users (owner_id));
diesel::joinable!(favorites -> users (user_id));
diesel::joinable!(favorites -> properties (property_id));

diesel::allow_tables_to_appear_in_same_query!(users, properties, favorites);
