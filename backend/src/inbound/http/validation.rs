//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure here is a 400 `invalid_request` whose `details.code` is
//! `invalid_input`, with the offending field and, where useful, value.

use serde_json::json;

use crate::domain::{Error, IdValidationError};

/// Why a request field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reason {
    MissingField,
    InvalidId,
    InvalidValue,
}

impl Reason {
    fn as_str(self) -> &'static str {
        match self {
            Reason::MissingField => "missing_field",
            Reason::InvalidId => "invalid_id",
            Reason::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_input(field: FieldName, reason: Reason, message: String, value: Option<&str>) -> Error {
    let mut details = json!({
        "code": "invalid_input",
        "field": field.as_str(),
        "reason": reason.as_str(),
    });
    if let (Some(value), Some(map)) = (value, details.as_object_mut()) {
        map.insert("value".to_owned(), json!(value));
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    invalid_input(
        field,
        Reason::MissingField,
        format!("missing required field: {}", field.as_str()),
        None,
    )
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    invalid_input(
        field,
        Reason::InvalidId,
        format!("{} must be a positive integer", field.as_str()),
        Some(value),
    )
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, expected: &str) -> Error {
    invalid_input(
        field,
        Reason::InvalidValue,
        format!("{} must be one of {expected}", field.as_str()),
        Some(value),
    )
}

/// Unwrap a required field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a textual identifier from a path segment or query parameter.
pub(crate) fn parse_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64, Error = IdValidationError>,
{
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| invalid_id_error(field, raw))
}

/// Validate an identifier that arrived as a JSON number.
pub(crate) fn id_from_number<T>(raw: i64, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64, Error = IdValidationError>,
{
    T::try_from(raw).map_err(|_| invalid_id_error(field, &raw.to_string()))
}
