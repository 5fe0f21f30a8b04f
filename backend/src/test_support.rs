//! Shared fixtures for unit tests across the crate.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{
    AreaUnit, DisplayName, Email, Listing, ListingDetails, ListingDetailsDraft, ListingDraft,
    ListingId, ListingStatus, ListingType, PropertyType, Role, User, UserDraft, UserId,
};

/// Parse a decimal literal used by fixtures.
pub(crate) fn decimal(raw: &str) -> BigDecimal {
    BigDecimal::from_str(raw).expect("fixture decimal")
}

/// A fixed instant so ordering assertions stay deterministic.
pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("fixture timestamp")
}

/// `epoch()` shifted by whole days.
pub(crate) fn days_after_epoch(days: i64) -> DateTime<Utc> {
    epoch() + Duration::days(days)
}

/// A valid draft for a Lagos apartment; tests tweak individual fields.
pub(crate) fn details_draft() -> ListingDetailsDraft {
    ListingDetailsDraft {
        title: "Three bedroom flat in Lekki".to_owned(),
        description: Some("Serviced apartment close to the beach".to_owned()),
        price: decimal("3500000"),
        state: "Lagos".to_owned(),
        city: "Lekki".to_owned(),
        neighborhood: Some("Phase 1".to_owned()),
        address: "12 Admiralty Way".to_owned(),
        property_type: PropertyType::Apartment,
        listing_type: ListingType::Sale,
        bedrooms: Some(3),
        bathrooms: Some(2),
        area: decimal("120.5"),
        area_unit: AreaUnit::Sqm,
        contact_name: "Ada Obi".to_owned(),
        contact_phone: "08031234567".to_owned(),
        contact_email: "ada@example.com".to_owned(),
    }
}

pub(crate) fn details(draft: ListingDetailsDraft) -> ListingDetails {
    ListingDetails::try_from(draft).expect("fixture details")
}

/// Builder for listings with explicit search-relevant attributes.
#[derive(Clone)]
pub(crate) struct ListingFixture {
    pub(crate) owner: UserId,
    pub(crate) draft: ListingDetailsDraft,
    pub(crate) status: ListingStatus,
    pub(crate) created_at: DateTime<Utc>,
}

impl ListingFixture {
    pub(crate) fn new(owner: UserId) -> Self {
        Self {
            owner,
            draft: details_draft(),
            status: ListingStatus::Active,
            created_at: epoch(),
        }
    }

    pub(crate) fn located(mut self, state: &str, city: &str) -> Self {
        self.draft.state = state.to_owned();
        self.draft.city = city.to_owned();
        self
    }

    pub(crate) fn typed(mut self, property_type: PropertyType, listing_type: ListingType) -> Self {
        self.draft.property_type = property_type;
        self.draft.listing_type = listing_type;
        self
    }

    pub(crate) fn priced(mut self, price: &str) -> Self {
        self.draft.price = decimal(price);
        self
    }

    pub(crate) fn rooms(mut self, bedrooms: Option<i32>, bathrooms: Option<i32>) -> Self {
        self.draft.bedrooms = bedrooms;
        self.draft.bathrooms = bathrooms;
        self
    }

    pub(crate) fn titled(mut self, title: &str) -> Self {
        self.draft.title = title.to_owned();
        self
    }

    pub(crate) fn status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub(crate) fn build(self) -> Listing {
        Listing::from(ListingDraft {
            id: ListingId::random(),
            owner_id: self.owner,
            details: details(self.draft),
            images: Vec::new(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.created_at,
        })
    }
}

/// A user with the given role and a placeholder password hash.
pub(crate) fn user_with_role(email: &str, role: Role) -> User {
    User::from(UserDraft {
        id: UserId::random(),
        email: Email::new(email).expect("fixture email"),
        name: DisplayName::new("Fixture User").expect("fixture name"),
        role,
        password_hash: "hash:password123".to_owned(),
        email_verified: false,
        last_login: None,
        created_at: epoch(),
    })
}
