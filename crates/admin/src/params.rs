//! Explicit parsing of query/path parameters.
//!
//! Mirrors the storefront's discipline: every numeric identifier arriving
//! over HTTP is parsed to a positive i32 before any repository call.

use std::collections::HashMap;

use crate::error::AppError;

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

/// Parse an optional query-string identifier. Absent is `None`; present
/// but malformed is an error, never a silent unfiltered query.
///
/// # Errors
///
/// Returns `AppError::Validation` when the value is present and not a
/// positive integer.
pub fn optional_id<T: From<i32>>(
    query: &HashMap<String, String>,
    field: &str,
) -> Result<Option<T>, AppError> {
    query
        .get(field)
        .map(|raw| parse_positive(raw, field).map(T::from))
        .transpose()
}

/// Validate that a trimmed string is non-empty, returning the trimmed copy.
///
/// # Errors
///
/// Returns `AppError::Validation` when the value is empty or whitespace.
pub fn non_empty(raw: &str, field: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(AppError::Validation(format!("Invalid {field}")))
    } else {
        Ok(trimmed.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use piyesa_core::ProductId;

    use super::*;

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("12", "productId").unwrap(), 12);
        assert!(parse_positive("0", "productId").is_err());
        assert!(parse_positive("-1", "productId").is_err());
        assert!(parse_positive("twelve", "productId").is_err());
    }

    #[test]
    fn test_path_and_body_id() {
        let id: ProductId = path_id("4", "id").unwrap();
        assert_eq!(id.as_i32(), 4);
        assert!(body_id::<ProductId>(0, "productId").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  Toyota ", "name").unwrap(), "Toyota");
        assert!(non_empty("   ", "name").is_err());
        assert!(non_empty("", "name").is_err());
    }

    #[test]
    fn test_optional_id() {
        let mut query = HashMap::new();
        assert_eq!(optional_id::<ProductId>(&query, "productId").unwrap(), None);

        query.insert("productId".to_owned(), "7".to_owned());
        let id: Option<ProductId> = optional_id(&query, "productId").unwrap();
        assert_eq!(id.map(|v| v.as_i32()), Some(7));

        query.insert("productId".to_owned(), "zero".to_owned());
        assert!(optional_id::<ProductId>(&query, "productId").is_err());
    }
}
