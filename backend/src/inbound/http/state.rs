//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AdminCommand, AdminQuery, FavoritesCommand, FavoritesQuery, ListingsCommand,
    ListingsQuery, LoginService, UserProfileQuery,
};
use crate::domain::{Actor, Error};

use super::session::SessionContext;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub listings: Arc<dyn ListingsQuery>,
    pub listings_command: Arc<dyn ListingsCommand>,
    pub favorites: Arc<dyn FavoritesCommand>,
    pub favorites_query: Arc<dyn FavoritesQuery>,
    pub admin: Arc<dyn AdminQuery>,
    pub admin_command: Arc<dyn AdminCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub listings: Arc<dyn ListingsQuery>,
    pub listings_command: Arc<dyn ListingsCommand>,
    pub favorites: Arc<dyn FavoritesCommand>,
    pub favorites_query: Arc<dyn FavoritesQuery>,
    pub admin: Arc<dyn AdminQuery>,
    pub admin_command: Arc<dyn AdminCommand>,
}

impl HttpState {
    /// Construct state from the port bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            profile,
            accounts,
            listings,
            listings_command,
            favorites,
            favorites_query,
            admin,
            admin_command,
        } = ports;
        Self {
            login,
            profile,
            accounts,
            listings,
            listings_command,
            favorites,
            favorites_query,
            admin,
            admin_command,
        }
    }

    /// Resolve the signed-in caller with their current role.
    ///
    /// Fails with `unauthorized` when there is no session or the account no
    /// longer exists.
    pub async fn actor(&self, session: &SessionContext) -> Result<Actor, Error> {
        let user_id = session.require_user_id()?;
        self.profile.resolve_actor(&user_id).await
    }
}
