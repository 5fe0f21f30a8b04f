//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{DateRange, Email, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Predicate for admin user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Exact role match.
    pub role: Option<Role>,
    /// Case-insensitive substring of the name or email.
    pub search: Option<String>,
}

impl UserFilter {
    /// Whether `user` satisfies every present predicate.
    pub fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role() == role)
            && self.search.as_deref().is_none_or(|needle| {
                let needle = needle.to_lowercase();
                user.name().as_ref().to_lowercase().contains(&needle)
                    || user.email().as_ref().contains(&needle)
            })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; fails with `DuplicateEmail` when taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Persist changes to an existing account. Returns `false` when the
    /// account no longer exists.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by (normalised) email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// One page of users matching `filter`, newest first.
    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Number of users matching `filter`.
    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError>;

    /// Number of users created inside `range`.
    async fn count_created(&self, range: &DateRange) -> Result<u64, UserPersistenceError>;

    /// Sparse `(role, count)` rows for users created inside `range`.
    async fn count_by_role(
        &self,
        range: &DateRange,
    ) -> Result<Vec<(Role, u64)>, UserPersistenceError>;

    /// The most recently created users.
    async fn recent(&self, limit: u32) -> Result<Vec<User>, UserPersistenceError>;
}
