//! Request and response bodies shared by the listing, search, favorites and
//! admin handlers.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use pagination::{Paginated, PaginationEnvelope};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AreaUnit, Error, Listing, ListingDetails, ListingDetailsDraft, ListingPatch, ListingStatus,
    ListingType, PropertyType,
};

use super::validation::{
    FieldName, missing_field_error, parse_optional_enum, parse_required_enum,
};

/// A listing as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub owner_id: String,
    #[schema(example = "Three bedroom flat in Lekki")]
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "3500000")]
    pub price: BigDecimal,
    #[schema(example = "Lagos")]
    pub state: String,
    #[schema(example = "Lekki")]
    pub city: String,
    pub neighborhood: Option<String>,
    pub address: String,
    #[schema(example = "APARTMENT")]
    pub property_type: String,
    #[schema(example = "SALE")]
    pub listing_type: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    #[schema(value_type = String, example = "120.5")]
    pub area: BigDecimal,
    #[schema(example = "sqm")]
    pub area_unit: String,
    pub images: Vec<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    #[schema(example = "ACTIVE")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Listing> for ListingResponse {
    fn from(listing: &Listing) -> Self {
        let details = listing.details();
        Self {
            id: listing.id().to_string(),
            owner_id: listing.owner_id().to_string(),
            title: details.title().to_owned(),
            description: details.description().map(str::to_owned),
            price: details.price().clone(),
            state: details.state().to_owned(),
            city: details.city().to_owned(),
            neighborhood: details.neighborhood().map(str::to_owned),
            address: details.address().to_owned(),
            property_type: details.property_type().to_string(),
            listing_type: details.listing_type().to_string(),
            bedrooms: details.bedrooms(),
            bathrooms: details.bathrooms(),
            area: details.area().clone(),
            area_unit: details.area_unit().to_string(),
            images: listing.images().to_vec(),
            contact_name: details.contact_name().to_owned(),
            contact_phone: details.contact_phone().to_owned(),
            contact_email: details.contact_email().to_string(),
            status: listing.status().to_string(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        }
    }
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self::from(&listing)
    }
}

/// A page of listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingPage {
    pub properties: Vec<ListingResponse>,
    #[schema(value_type = PaginationSchema)]
    pub pagination: PaginationEnvelope,
}

impl From<Paginated<Listing>> for ListingPage {
    fn from(page: Paginated<Listing>) -> Self {
        let Paginated { items, pagination } = page;
        Self {
            properties: items.iter().map(ListingResponse::from).collect(),
            pagination,
        }
    }
}

/// OpenAPI shape of the pagination envelope.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginationSchema {
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 10)]
    limit: u32,
    #[schema(example = 42)]
    total: u64,
    #[schema(example = 5)]
    pages: u64,
}

/// Body for `POST /properties`.
///
/// Fields are optional at the wire level so a missing one is reported by
/// name rather than as a generic JSON error.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "3500000")]
    pub price: Option<BigDecimal>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    #[schema(example = "APARTMENT")]
    pub property_type: Option<String>,
    #[schema(example = "SALE")]
    pub listing_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    #[schema(value_type = Option<String>, example = "120.5")]
    pub area: Option<BigDecimal>,
    /// Defaults to `sqm`.
    pub area_unit: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(FieldName::new(field)))
}

impl TryFrom<ListingRequest> for ListingDetails {
    type Error = Error;

    fn try_from(request: ListingRequest) -> Result<Self, Self::Error> {
        let property_type = required(request.property_type, "propertyType")?;
        let listing_type = required(request.listing_type, "listingType")?;
        let draft = ListingDetailsDraft {
            title: required(request.title, "title")?,
            description: request.description,
            price: required(request.price, "price")?,
            state: required(request.state, "state")?,
            city: required(request.city, "city")?,
            neighborhood: request.neighborhood,
            address: required(request.address, "address")?,
            property_type: parse_required_enum(FieldName::new("propertyType"), property_type)?,
            listing_type: parse_required_enum(FieldName::new("listingType"), listing_type)?,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            area: required(request.area, "area")?,
            area_unit: parse_optional_enum::<AreaUnit>(
                FieldName::new("areaUnit"),
                request.area_unit,
            )?
            .unwrap_or_default(),
            contact_name: required(request.contact_name, "contactName")?,
            contact_phone: required(request.contact_phone, "contactPhone")?,
            contact_email: required(request.contact_email, "contactEmail")?,
        };
        ListingDetails::try_from(draft).map_err(Error::from)
    }
}

/// Body for `PUT /properties/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatchRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<BigDecimal>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub area: Option<BigDecimal>,
    pub area_unit: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    /// `ACTIVE`, `INACTIVE`, `SOLD` or `RENTED`.
    pub status: Option<String>,
}

impl TryFrom<ListingPatchRequest> for ListingPatch {
    type Error = Error;

    fn try_from(request: ListingPatchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            property_type: parse_optional_enum::<PropertyType>(
                FieldName::new("propertyType"),
                request.property_type,
            )?,
            listing_type: parse_optional_enum::<ListingType>(
                FieldName::new("listingType"),
                request.listing_type,
            )?,
            area_unit: parse_optional_enum::<AreaUnit>(
                FieldName::new("areaUnit"),
                request.area_unit,
            )?,
            status: parse_optional_enum::<ListingStatus>(
                FieldName::new("status"),
                request.status,
            )?,
            title: request.title,
            description: request.description,
            price: request.price,
            state: request.state,
            city: request.city,
            neighborhood: request.neighborhood,
            address: request.address,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            area: request.area,
            contact_name: request.contact_name,
            contact_phone: request.contact_phone,
            contact_email: request.contact_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use crate::test_support::{ListingFixture, decimal};
    use rstest::{fixture, rstest};

    #[fixture]
    fn lagos_request() -> ListingRequest {
        ListingRequest {
            title: Some("Three bedroom flat in Lekki".into()),
            description: None,
            price: Some(decimal("3500000")),
            state: Some("Lagos".into()),
            city: Some("Lekki".into()),
            neighborhood: None,
            address: Some("12 Admiralty Way".into()),
            property_type: Some("apartment".into()),
            listing_type: Some("SALE".into()),
            bedrooms: Some(3),
            bathrooms: Some(2),
            area: Some(decimal("120.5")),
            area_unit: None,
            contact_name: Some("Ada Obi".into()),
            contact_phone: Some("08031234567".into()),
            contact_email: Some("ada@example.com".into()),
        }
    }

    #[rstest]
    fn complete_request_becomes_details(lagos_request: ListingRequest) {
        let details = ListingDetails::try_from(lagos_request).expect("valid request");
        assert_eq!(details.property_type(), PropertyType::Apartment);
        assert_eq!(details.area_unit(), AreaUnit::Sqm);
    }

    #[rstest]
    fn missing_field_is_named(lagos_request: ListingRequest) {
        let request = ListingRequest {
            contact_phone: None,
            ..lagos_request
        };
        let error = ListingDetails::try_from(request).expect_err("missing phone");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "contactPhone");
        assert_eq!(details["code"], "missing_field");
    }

    #[rstest]
    fn zero_price_is_rejected(lagos_request: ListingRequest) {
        let request = ListingRequest {
            price: Some(decimal("0")),
            ..lagos_request
        };
        let error = ListingDetails::try_from(request).expect_err("zero price");
        assert_eq!(error.details().expect("details")["field"], "price");
    }

    #[rstest]
    fn patch_rejects_unknown_listing_type() {
        let request = ListingPatchRequest {
            listing_type: Some("LEASE".into()),
            ..ListingPatchRequest::default()
        };
        let error = ListingPatch::try_from(request).expect_err("unknown type");
        assert_eq!(error.details().expect("details")["field"], "listingType");
    }

    #[rstest]
    #[case("sold", Some(ListingStatus::Sold))]
    #[case("RENTED", Some(ListingStatus::Rented))]
    #[case("", None)]
    fn patch_parses_status(#[case] raw: &str, #[case] expected: Option<ListingStatus>) {
        let request = ListingPatchRequest {
            status: Some(raw.into()),
            ..ListingPatchRequest::default()
        };
        let patch = ListingPatch::try_from(request).expect("valid status");
        assert_eq!(patch.status, expected);
    }

    #[rstest]
    fn patch_rejects_unknown_status() {
        let request = ListingPatchRequest {
            status: Some("ARCHIVED".into()),
            ..ListingPatchRequest::default()
        };
        let error = ListingPatch::try_from(request).expect_err("unknown status");
        assert_eq!(error.details().expect("details")["field"], "status");
    }

    #[rstest]
    fn response_uses_wire_spellings() {
        let listing = ListingFixture::new(UserId::random()).build();
        let value = serde_json::to_value(ListingResponse::from(&listing)).expect("serialise");
        assert_eq!(value["propertyType"], "APARTMENT");
        assert_eq!(value["areaUnit"], "sqm");
        assert_eq!(value["status"], "ACTIVE");
        assert_eq!(value["price"], "3500000");
    }
}
