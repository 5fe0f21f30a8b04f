//! Role and ownership checks for mutating operations.
//!
//! Every mutation asks [`authorize`] before touching a store. Denials carry
//! no side effects; the caller turns them into `forbidden` errors via
//! [`Actor::require`].

use super::{Error, Role, UserId};

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateListing,
    UpdateListing,
    DeleteListing,
    UploadListingImages,
    Administer,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

/// Decide whether `actor` may perform `action`.
///
/// `owner` is the owning user of the target resource, when there is one.
/// Admins bypass ownership.
pub fn authorize(actor: &Actor, action: Action, owner: Option<&UserId>) -> Decision {
    match action {
        Action::CreateListing => match actor.role {
            Role::Seller | Role::Agent | Role::Admin => Decision::Allow,
            Role::Buyer => Decision::Deny("only sellers and agents can create listings"),
        },
        Action::UpdateListing | Action::DeleteListing | Action::UploadListingImages => {
            if actor.role == Role::Admin || owner == Some(&actor.user_id) {
                Decision::Allow
            } else {
                Decision::Deny("you can only modify your own listings")
            }
        }
        Action::Administer => {
            if actor.role == Role::Admin {
                Decision::Allow
            } else {
                Decision::Deny("administrator access required")
            }
        }
    }
}

impl Actor {
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Fail with `forbidden` unless [`authorize`] allows the action.
    pub fn require(&self, action: Action, owner: Option<&UserId>) -> Result<(), Error> {
        match authorize(self, action, owner) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(Error::forbidden(reason)),
        }
    }
}
