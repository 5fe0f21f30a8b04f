//! Owner-editable listing content and its validation rules.

use std::sync::OnceLock;

use bigdecimal::BigDecimal;
use regex::Regex;
use serde_json::json;

use super::enums::{AreaUnit, ListingStatus, ListingType, PropertyType};
use crate::domain::{Email, Error};

/// Largest bedroom or bathroom count a listing may declare.
pub const MAX_ROOMS: i32 = 20;

/// A listing field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must be between 0 and {max}")]
    RoomCount { field: &'static str, max: i32 },
    #[error("contactPhone must be a Nigerian mobile number")]
    InvalidPhone,
    #[error("contactEmail must be a valid email address")]
    InvalidEmail,
}

impl ListingValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Length { field, .. }
            | Self::NotPositive { field }
            | Self::RoomCount { field, .. } => field,
            Self::InvalidPhone => "contactPhone",
            Self::InvalidEmail => "contactEmail",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Length { .. } => "invalid_length",
            Self::NotPositive { .. } => "not_positive",
            Self::RoomCount { .. } => "out_of_range",
            Self::InvalidPhone => "invalid_phone",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl From<ListingValidationError> for Error {
    fn from(error: ListingValidationError) -> Self {
        let details = json!({ "field": error.field(), "code": error.code() });
        Error::invalid_request(error.to_string()).with_details(details)
    }
}

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^(\+234|0)[789][01]\d{8}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Unvalidated listing content, as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetailsDraft {
    pub title: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub state: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub address: String,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: BigDecimal,
    pub area_unit: AreaUnit,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
}

/// Validated listing content.
///
/// ## Invariants
/// - `price` and `area` are strictly positive.
/// - `bedrooms` and `bathrooms`, when present, lie in `0..=20`.
/// - text fields are trimmed and within their length bounds; blank optional
///   text is stored as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetails {
    title: String,
    description: Option<String>,
    price: BigDecimal,
    state: String,
    city: String,
    neighborhood: Option<String>,
    address: String,
    property_type: PropertyType,
    listing_type: ListingType,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    area: BigDecimal,
    area_unit: AreaUnit,
    contact_name: String,
    contact_phone: String,
    contact_email: Email,
}

fn bounded_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, ListingValidationError> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if length < min || length > max {
        return Err(ListingValidationError::Length { field, min, max });
    }
    Ok(trimmed.to_owned())
}

fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ListingValidationError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => bounded_text(field, text, 1, max).map(Some),
    }
}

fn positive(field: &'static str, value: BigDecimal) -> Result<BigDecimal, ListingValidationError> {
    if value <= BigDecimal::from(0) {
        return Err(ListingValidationError::NotPositive { field });
    }
    Ok(value)
}

fn room_count(
    field: &'static str,
    value: Option<i32>,
) -> Result<Option<i32>, ListingValidationError> {
    match value {
        Some(count) if !(0..=MAX_ROOMS).contains(&count) => {
            Err(ListingValidationError::RoomCount {
                field,
                max: MAX_ROOMS,
            })
        }
        other => Ok(other),
    }
}

impl TryFrom<ListingDetailsDraft> for ListingDetails {
    type Error = ListingValidationError;

    fn try_from(draft: ListingDetailsDraft) -> Result<Self, Self::Error> {
        let ListingDetailsDraft {
            title,
            description,
            price,
            state,
            city,
            neighborhood,
            address,
            property_type,
            listing_type,
            bedrooms,
            bathrooms,
            area,
            area_unit,
            contact_name,
            contact_phone,
            contact_email,
        } = draft;

        let contact_phone = contact_phone.trim().to_owned();
        if !phone_regex().is_match(&contact_phone) {
            return Err(ListingValidationError::InvalidPhone);
        }

        Ok(Self {
            title: bounded_text("title", &title, 3, 255)?,
            description: optional_text("description", description, 2000)?,
            price: positive("price", price)?,
            state: bounded_text("state", &state, 2, 100)?,
            city: bounded_text("city", &city, 2, 100)?,
            neighborhood: optional_text("neighborhood", neighborhood, 100)?,
            address: bounded_text("address", &address, 5, 500)?,
            property_type,
            listing_type,
            bedrooms: room_count("bedrooms", bedrooms)?,
            bathrooms: room_count("bathrooms", bathrooms)?,
            area: positive("area", area)?,
            area_unit,
            contact_name: bounded_text("contactName", &contact_name, 2, 255)?,
            contact_phone,
            contact_email: Email::new(&contact_email)
                .map_err(|_| ListingValidationError::InvalidEmail)?,
        })
    }
}

impl From<ListingDetails> for ListingDetailsDraft {
    fn from(details: ListingDetails) -> Self {
        Self {
            title: details.title,
            description: details.description,
            price: details.price,
            state: details.state,
            city: details.city,
            neighborhood: details.neighborhood,
            address: details.address,
            property_type: details.property_type,
            listing_type: details.listing_type,
            bedrooms: details.bedrooms,
            bathrooms: details.bathrooms,
            area: details.area,
            area_unit: details.area_unit,
            contact_name: details.contact_name,
            contact_phone: details.contact_phone,
            contact_email: details.contact_email.into(),
        }
    }
}

/// Partial update to a listing. Absent fields keep their value.
///
/// `status` is applied to the listing itself rather than its content, so
/// [`ListingDetails::patched`] ignores it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<BigDecimal>,
    pub area_unit: Option<AreaUnit>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub status: Option<ListingStatus>,
}

impl ListingDetails {
    /// Merge `patch` over the current content and revalidate the result.
    pub fn patched(&self, patch: ListingPatch) -> Result<Self, ListingValidationError> {
        let current = ListingDetailsDraft::from(self.clone());
        let merged = ListingDetailsDraft {
            title: patch.title.unwrap_or(current.title),
            description: patch.description.or(current.description),
            price: patch.price.unwrap_or(current.price),
            state: patch.state.unwrap_or(current.state),
            city: patch.city.unwrap_or(current.city),
            neighborhood: patch.neighborhood.or(current.neighborhood),
            address: patch.address.unwrap_or(current.address),
            property_type: patch.property_type.unwrap_or(current.property_type),
            listing_type: patch.listing_type.unwrap_or(current.listing_type),
            bedrooms: patch.bedrooms.or(current.bedrooms),
            bathrooms: patch.bathrooms.or(current.bathrooms),
            area: patch.area.unwrap_or(current.area),
            area_unit: patch.area_unit.unwrap_or(current.area_unit),
            contact_name: patch.contact_name.unwrap_or(current.contact_name),
            contact_phone: patch.contact_phone.unwrap_or(current.contact_phone),
            contact_email: patch.contact_email.unwrap_or(current.contact_email),
        };
        Self::try_from(merged)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> &BigDecimal {
        &self.price
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn neighborhood(&self) -> Option<&str> {
        self.neighborhood.as_deref()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn listing_type(&self) -> ListingType {
        self.listing_type
    }

    pub fn bedrooms(&self) -> Option<i32> {
        self.bedrooms
    }

    pub fn bathrooms(&self) -> Option<i32> {
        self.bathrooms
    }

    pub fn area(&self) -> &BigDecimal {
        &self.area
    }

    pub fn area_unit(&self) -> AreaUnit {
        self.area_unit
    }

    pub fn contact_name(&self) -> &str {
        &self.contact_name
    }

    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    pub fn contact_email(&self) -> &Email {
        &self.contact_email
    }
}
