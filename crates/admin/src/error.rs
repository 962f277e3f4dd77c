//! Unified error handling for admin.
//!
//! Same taxonomy and JSON envelope as the storefront: clients see
//! `{"error": "..."}` with a mapped status, and server-class failures go
//! to Sentry with the original detail kept out of the response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing client input (bad id, bad body, bad status).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Constraint violation (duplicate natural key, referenced row).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::InsufficientStock { .. } => {
                Self::Validation("Quantity exceeds stock on hand".to_owned())
            }
            other => Self::Database(other),
        }
    }
}

/// JSON error envelope returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Validation(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.clone(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_owned());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = AppError::Validation("Invalid productId".to_owned());
        assert_eq!(err.to_string(), "Validation error: Invalid productId");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("test".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Conflict("test".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            status_of(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RepositoryError::Conflict("region is still referenced".to_owned()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RepositoryError::InsufficientStock { available: 3 }.into()),
            StatusCode::BAD_REQUEST
        );
    }
}
