//! User accounts and roles.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("email must be a valid email address")]
    InvalidEmail,
    #[error("name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("role must be one of BUYER, SELLER, AGENT, ADMIN")]
    UnknownRole,
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random identifier for a new account.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the inner UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Lower-cased, syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    ///
    /// # Examples
    /// ```
    /// use realestatehub::domain::Email;
    ///
    /// let email = Email::new(" Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.len() > 255 || !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Human-readable account name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub const MIN: usize = 2;
    pub const MAX: usize = 100;

    /// Trim and validate a display name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if !(Self::MIN..=Self::MAX).contains(&length) {
            return Err(UserValidationError::NameLength {
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// Account role. Stored and serialised in upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Buyer,
    Seller,
    Agent,
    Admin,
}

impl Role {
    /// Every role, in reporting order.
    pub const ALL: [Role; 4] = [Role::Buyer, Role::Seller, Role::Agent, Role::Admin];

    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
            Self::Agent => "AGENT",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(UserValidationError::UnknownRole)
    }
}

/// Registered account.
///
/// The password hash never leaves the domain; inbound adapters serialise a
/// profile view instead of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: DisplayName,
    role: Role,
    password_hash: String,
    email_verified: bool,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Field bundle used to build a [`User`] from validated parts.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub email: Email,
    pub name: DisplayName,
    pub role: Role,
    pub password_hash: String,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<UserDraft> for User {
    fn from(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            email,
            name,
            role,
            password_hash,
            email_verified,
            last_login,
            created_at,
        } = draft;
        Self {
            id,
            email,
            name,
            role,
            password_hash,
            email_verified,
            last_login,
            created_at,
        }
    }
}

impl User {
    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return a copy with a different role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_name(mut self, name: DisplayName) -> Self {
        self.name = name;
        self
    }

    /// Return a copy carrying a freshly computed password hash.
    pub fn with_password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = password_hash;
        self
    }

    /// Return a copy with the last-login timestamp set.
    pub fn with_last_login(mut self, at: DateTime<Utc>) -> Self {
        self.last_login = Some(at);
        self
    }
}
