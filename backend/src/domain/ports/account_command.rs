//! Driving port for account mutations.

use async_trait::async_trait;

use crate::domain::{DisplayName, Error, PasswordChange, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account. A taken email is a `conflict`.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;

    /// Replace the caller's display name.
    async fn update_profile(&self, user_id: &UserId, name: DisplayName) -> Result<User, Error>;

    /// Replace the caller's password after verifying the current one.
    async fn change_password(&self, user_id: &UserId, change: &PasswordChange)
    -> Result<(), Error>;
}
