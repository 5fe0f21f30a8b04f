//! Account services: registration, login and profile management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, LoginService, PasswordHashError, PasswordHasher, UserPersistenceError,
    UserProfileQuery, UserRepository,
};
use crate::domain::{
    Actor, DisplayName, Error, LoginCredentials, PasswordChange, Registration, User, UserDraft,
    UserId,
};

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => {
                Error::conflict("email is already registered")
            }
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    fn invalid_credentials() -> Error {
        Error::unauthorized("invalid email or password")
    }

    async fn load(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)
    }

    async fn load_existing(&self, user_id: &UserId) -> Result<User, Error> {
        self.load(user_id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn save(&self, user: &User) -> Result<(), Error> {
        let updated = self.users.update(user).await.map_err(Self::map_user_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found("user not found"))
        }
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Self::invalid_credentials());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(Self::map_hash_error)?;
        if !verified {
            return Err(Self::invalid_credentials());
        }

        let user = user.with_last_login(Utc::now());
        if let Err(error) = self.users.update(&user).await {
            warn!(user_id = %user.id(), %error, "failed to record last login");
        }
        info!(user_id = %user.id(), "user logged in");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        if self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(Self::map_user_error)?
            .is_some()
        {
            return Err(Self::map_user_error(UserPersistenceError::duplicate_email(
                registration.email().as_ref(),
            )));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(Self::map_hash_error)?;
        let user = User::from(UserDraft {
            id: UserId::random(),
            email: registration.email().clone(),
            name: registration.name().clone(),
            role: registration.role(),
            password_hash,
            email_verified: false,
            last_login: None,
            created_at: Utc::now(),
        });
        self.users.insert(&user).await.map_err(Self::map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }

    async fn update_profile(&self, user_id: &UserId, name: DisplayName) -> Result<User, Error> {
        let user = self.load_existing(user_id).await?.with_name(name);
        self.save(&user).await?;
        Ok(user)
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        change: &PasswordChange,
    ) -> Result<(), Error> {
        let user = self.load_existing(user_id).await?;
        let verified = self
            .hasher
            .verify(change.current(), user.password_hash())
            .map_err(Self::map_hash_error)?;
        if !verified {
            return Err(Error::unauthorized("current password is incorrect"));
        }
        let password_hash = self
            .hasher
            .hash(change.new_password())
            .map_err(Self::map_hash_error)?;
        self.save(&user.with_password_hash(password_hash)).await?;
        info!(user_id = %user_id, "password changed");
        Ok(())
    }
}

#[async_trait]
impl<U, H> UserProfileQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load_existing(user_id).await
    }

    async fn resolve_actor(&self, user_id: &UserId) -> Result<Actor, Error> {
        self.load(user_id)
            .await?
            .map(|user| Actor::new(*user.id(), user.role()))
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}
