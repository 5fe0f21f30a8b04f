//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod admin;
pub mod auth;
pub mod error;
pub mod favorites;
pub mod health;
pub mod listings;
pub mod listings_dto;
pub mod schemas;
pub mod search;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller supplies the scope, the session middleware and the
/// [`state::HttpState`] app data.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::get_profile)
        .service(auth::update_profile)
        .service(auth::change_password)
        .service(listings::list_properties)
        .service(listings::create_property)
        .service(listings::get_property)
        .service(listings::update_property)
        .service(listings::delete_property)
        .service(listings::upload_image)
        .service(search::search)
        .service(search::locations)
        .service(search::property_types)
        .service(favorites::list_favorites)
        .service(favorites::add_favorite)
        .service(favorites::remove_favorite)
        .service(favorites::check_favorite)
        .service(admin::dashboard)
        .service(admin::list_users)
        .service(admin::change_role)
        .service(admin::list_properties)
        .service(admin::change_status)
        .service(admin::delete_property)
        .service(admin::report);
}
