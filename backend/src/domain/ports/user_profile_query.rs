//! Driving port for user profile queries.
//!
//! Inbound adapters use this port to load the caller's profile and to turn
//! a session's user id into an [`Actor`] carrying the current role.

use async_trait::async_trait;

use crate::domain::{Actor, Error, User, UserId};

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the authenticated user.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;

    /// Resolve the caller's current role. A deleted account is
    /// `unauthorized`.
    async fn resolve_actor(&self, user_id: &UserId) -> Result<Actor, Error>;
}
