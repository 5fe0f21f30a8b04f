//! Field-level validation failures.
//!
//! Parsers in the domain report which input field was rejected and why;
//! the conversion into [`Error`] carries that context in `details` so
//! clients can highlight the offending field.

use serde_json::json;

use super::Error;

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    InvalidNumber,
    Negative,
    OutOfRange,
    InvalidEnum,
    InvalidRange,
    InvalidDate,
    InvalidReportType,
    Invalid,
}

impl FieldErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidNumber => "invalid_number",
            Self::Negative => "negative",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnum => "invalid_enum",
            Self::InvalidRange => "invalid_range",
            Self::InvalidDate => "invalid_date",
            Self::InvalidReportType => "invalid_report_type",
            Self::Invalid => "invalid",
        }
    }
}

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    field: &'static str,
    code: FieldErrorCode,
    message: String,
    value: Option<String>,
}

impl FieldError {
    pub fn new(field: &'static str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
            value: None,
        }
    }

    /// Record the offending raw value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn code(&self) -> FieldErrorCode {
        self.code
    }
}

impl From<FieldError> for Error {
    fn from(error: FieldError) -> Self {
        let details = match &error.value {
            Some(value) => json!({
                "field": error.field,
                "code": error.code.as_str(),
                "value": value,
            }),
            None => json!({
                "field": error.field,
                "code": error.code.as_str(),
            }),
        };
        Error::invalid_request(error.message).with_details(details)
    }
}
