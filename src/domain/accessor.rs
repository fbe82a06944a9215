//! Lookup helpers shared by every derived accessor.
//!
//! Lookups return [`FieldResult`]: a missing key is a routine condition that
//! [`absorb_missing`] turns into `Ok(None)`, while type mismatches and unknown
//! state codes surface as [`StatusError`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::states::UnknownStateCode;

pub type RawMap = Map<String, Value>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatusError {
    #[error("no data available for vehicle status")]
    NoData,
    #[error("no profile attributes available for vehicle")]
    NoProfile,
    #[error(transparent)]
    UnknownState(#[from] UnknownStateCode),
    #[error("field {field} has unexpected type, expected {expected}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldError {
    Missing(String),
    Status(StatusError),
}

impl From<StatusError> for FieldError {
    fn from(error: StatusError) -> Self {
        Self::Status(error)
    }
}

impl From<UnknownStateCode> for FieldError {
    fn from(error: UnknownStateCode) -> Self {
        Self::Status(StatusError::UnknownState(error))
    }
}

pub(crate) type FieldResult<T> = Result<T, FieldError>;

/// Converts a missing field into `None`, logging which attribute had no data.
pub(crate) fn absorb_missing<T>(
    attribute: &'static str,
    result: FieldResult<T>,
) -> Result<Option<T>, StatusError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(FieldError::Missing(key)) => {
            tracing::debug!(attribute, key = %key, "no data available for attribute");
            Ok(None)
        }
        Err(FieldError::Status(error)) => Err(error),
    }
}

/// JSON `null` counts as missing.
pub(crate) fn field<'a>(object: &'a RawMap, key: &str) -> FieldResult<&'a Value> {
    match object.get(key) {
        Some(Value::Null) | None => Err(FieldError::Missing(key.to_string())),
        Some(value) => Ok(value),
    }
}

pub(crate) fn path<'a>(object: &'a RawMap, keys: &[&str]) -> FieldResult<&'a Value> {
    let (last, parents) = keys
        .split_last()
        .ok_or_else(|| FieldError::Missing(String::new()))?;

    let mut current = object;
    for key in parents {
        current = as_object(field(current, key)?, key)?;
    }

    field(current, last)
}

pub(crate) fn optional<T>(result: FieldResult<T>) -> FieldResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(FieldError::Missing(_)) => Ok(None),
        Err(error) => Err(error),
    }
}

fn unexpected(field: &str, expected: &'static str) -> FieldError {
    FieldError::Status(StatusError::UnexpectedType {
        field: field.to_string(),
        expected,
    })
}

pub(crate) fn as_object<'a>(value: &'a Value, field: &str) -> FieldResult<&'a RawMap> {
    value.as_object().ok_or_else(|| unexpected(field, "object"))
}

pub(crate) fn as_array<'a>(value: &'a Value, field: &str) -> FieldResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| unexpected(field, "array"))
}

pub(crate) fn as_str<'a>(value: &'a Value, field: &str) -> FieldResult<&'a str> {
    value.as_str().ok_or_else(|| unexpected(field, "string"))
}

pub(crate) fn as_bool(value: &Value, field: &str) -> FieldResult<bool> {
    value.as_bool().ok_or_else(|| unexpected(field, "boolean"))
}

/// Accepts JSON numbers and numeric strings.
pub(crate) fn as_f64(value: &Value, field: &str) -> FieldResult<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| unexpected(field, "number"))
}

/// Accepts integral JSON numbers, truncated floats and integer strings.
pub(crate) fn as_i64(value: &Value, field: &str) -> FieldResult<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| unexpected(field, "integer"))
}
