//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::search::{parse_enum, present};
use crate::domain::{Error, FieldError, FieldErrorCode, ListingId, UnknownVariant, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_listing_id(value: &str, field: FieldName) -> Result<ListingId, Error> {
    ListingId::parse(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a required closed-set body field such as `propertyType`.
pub(crate) fn parse_required_enum<T>(field: FieldName, raw: String) -> Result<T, Error>
where
    T: std::str::FromStr<Err = UnknownVariant>,
{
    parse_enum(field.as_str(), Some(raw))?.ok_or_else(|| missing_field_error(field))
}

/// Parse an optional closed-set value, treating blank input as absent.
pub(crate) fn parse_optional_enum<T>(
    field: FieldName,
    raw: Option<String>,
) -> Result<Option<T>, Error>
where
    T: std::str::FromStr<Err = UnknownVariant>,
{
    parse_enum(field.as_str(), present(raw)).map_err(Error::from)
}

/// Field error for a value outside a closed set that has no
/// [`UnknownVariant`] parser, such as a role.
pub(crate) fn invalid_choice_error(field: FieldName, value: &str, expected: &str) -> Error {
    let field = field.as_str();
    FieldError::new(
        field,
        FieldErrorCode::InvalidEnum,
        format!("{field} must be one of: {expected}"),
    )
    .with_value(value)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainErrorCode, PropertyType};
    use rstest::rstest;

    const LISTING: FieldName = FieldName::new("listingId");

    #[rstest]
    fn invalid_uuid_reports_field_and_value() {
        let error = parse_listing_id("not-a-uuid", LISTING).expect_err("invalid id");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "listingId", "value": "not-a-uuid", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    fn valid_uuid_parses() {
        let id = parse_listing_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", LISTING)
            .expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some("house"), Some(PropertyType::House))]
    fn optional_enum_treats_blank_as_absent(
        #[case] raw: Option<&str>,
        #[case] expected: Option<PropertyType>,
    ) {
        let field = FieldName::new("propertyType");
        let parsed = parse_optional_enum::<PropertyType>(field, raw.map(Into::into))
            .expect("valid value");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn required_enum_rejects_unknown_spelling() {
        let error =
            parse_required_enum::<PropertyType>(FieldName::new("propertyType"), "castle".into())
                .expect_err("unknown type");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "propertyType");
        assert_eq!(details["code"], "invalid_enum");
        assert_eq!(details["value"], "castle");
    }
}
