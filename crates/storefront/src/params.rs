//! Explicit parsing of query/path parameters.
//!
//! Every numeric identifier arriving over HTTP goes through
//! [`positive_id`] before any repository call, so malformed input is
//! rejected as a 400 without touching the database. Nothing downstream
//! of this module trusts a raw query-string value.

use crate::error::AppError;

/// Parse a required positive integer identifier.
///
/// `field` names the parameter in the error message ("regionId",
/// "barangayId", ...).
///
/// # Errors
///
/// Returns `AppError::Validation` when the value is missing, not an
/// integer, or not positive.
pub fn positive_id<T: From<i32>>(raw: Option<&str>, field: &str) -> Result<T, AppError> {
    let raw = raw.ok_or_else(|| AppError::Validation(format!("Invalid {field}")))?;
    parse_positive(raw, field).map(T::from)
}

/// Parse an already-extracted string as a positive integer identifier.
///
/// # Errors
///
/// Returns `AppError::Validation` when the value is not a positive integer.
pub fn parse_positive(raw: &str, field: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid {field}")))
}

/// Parse a path segment as a positive integer identifier.
///
/// Paths are extracted as `String` so malformed ids produce our envelope
/// instead of axum's default rejection.
///
/// # Errors
///
/// Returns `AppError::Validation` when the segment is not a positive integer.
pub fn path_id<T: From<i32>>(raw: &str, field: &str) -> Result<T, AppError> {
    parse_positive(raw, field).map(T::from)
}

/// Validate an identifier that arrived as a JSON number in a request body.
///
/// # Errors
///
/// Returns `AppError::Validation` when the value is not positive.
pub fn body_id<T: From<i32>>(value: i32, field: &str) -> Result<T, AppError> {
    if value > 0 {
        Ok(T::from(value))
    } else {
        Err(AppError::Validation(format!("Invalid {field}")))
    }
}

/// Validate a quantity (strictly positive, already deserialized).
///
/// # Errors
///
/// Returns `AppError::Validation` when the quantity is zero or negative.
pub fn positive_quantity(value: i32, field: &str) -> Result<i32, AppError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(AppError::Validation(format!("Invalid {field}")))
    }
}
