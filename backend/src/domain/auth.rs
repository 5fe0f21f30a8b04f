//! Authentication inputs: login credentials and registration requests.
//!
//! Handlers build these from raw payloads before talking to the account
//! service, so the service only ever sees validated values.

use serde_json::json;
use zeroize::Zeroizing;

use super::{DisplayName, Email, Error, Role, UserValidationError};

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validation failures for authentication payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("administrator accounts cannot be self-registered")]
    AdminRegistration,
    #[error(transparent)]
    User(#[from] UserValidationError),
}

impl AuthValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::User(UserValidationError::InvalidEmail) => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::AdminRegistration | Self::User(UserValidationError::UnknownRole) => "role",
            Self::User(UserValidationError::NameLength { .. }) => "name",
            Self::User(UserValidationError::InvalidId) => "id",
        }
    }
}

impl From<AuthValidationError> for Error {
    fn from(error: AuthValidationError) -> Self {
        let details = json!({ "field": error.field(), "code": "invalid" });
        Error::invalid_request(error.to_string()).with_details(details)
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised to lower case.
/// - `password` is non-empty and kept verbatim in a zeroising buffer.
///
/// # Examples
/// ```
/// use realestatehub::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter22").expect("valid");
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        if email.trim().is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email: Email::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    password: Zeroizing<String>,
    name: DisplayName,
    role: Role,
}

impl Registration {
    /// Validate registration inputs. The role defaults to [`Role::Buyer`].
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
        role: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        if email.trim().is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        let role = match role {
            Some(raw) => raw.parse::<Role>()?,
            None => Role::Buyer,
        };
        if role == Role::Admin {
            return Err(AuthValidationError::AdminRegistration);
        }
        Ok(Self {
            email: Email::new(email)?,
            password: Zeroizing::new(password.to_owned()),
            name: DisplayName::new(name)?,
            role,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Validated request to replace an account password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    new: Zeroizing<String>,
}

impl PasswordChange {
    /// Validate the pair. The new password follows the registration rules.
    pub fn try_from_parts(current: &str, new: &str) -> Result<Self, AuthValidationError> {
        if current.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            new: Zeroizing::new(new.to_owned()),
        })
    }

    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    pub fn new_password(&self) -> &str {
        self.new.as_str()
    }
}
