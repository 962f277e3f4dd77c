//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`;
//! nothing propagates unhandled to the transport layer.
//!
//! Responses are JSON `{"error": "..."}` with the mapped status code.
//! Internal detail (SQL, upstream payloads) is logged server-side only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::geocoder::GeocoderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing client input (bad id, short query, bad body).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Constraint violation (duplicate row, referenced reference data).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Geocoding provider unreachable or returned garbage.
    #[error("Upstream error: {0}")]
    Upstream(#[from] GeocoderError),

    /// Required deployment configuration is absent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

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
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Configuration(_)
                | Self::Upstream(
                    GeocoderError::Http(_)
                        | GeocoderError::Api { .. }
                        | GeocoderError::Parse(_)
                )
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            // The length guard lives in the client so it can never be
            // bypassed; it is the caller's mistake, not the provider's
            Self::Upstream(GeocoderError::QueryTooShort { .. }) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Upstream(err @ GeocoderError::QueryTooShort { .. }) => err.to_string(),
            Self::Upstream(_) => "Address search is temporarily unavailable".to_owned(),
            Self::Configuration(msg) => msg.clone(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_owned()
                }
            },
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
    fn test_status_mapping() {
        assert_eq!(
            status_of(AppError::Validation("Invalid regionId".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::NotFound("order not found".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Conflict("approved address already exists".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Configuration("geocoding is not configured".to_owned())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
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
            status_of(RepositoryError::Conflict("duplicate".to_owned()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RepositoryError::DataCorruption("bad email".to_owned()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let response =
            AppError::Database(RepositoryError::DataCorruption("secret detail".to_owned()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is the generic envelope; the detail only goes to logs
    }

    #[test]
    fn test_geocoder_error_mapping() {
        assert_eq!(
            status_of(GeocoderError::QueryTooShort { min: 3 }.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                GeocoderError::Api {
                    status: 500,
                    message: "provider exploded".to_owned(),
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(GeocoderError::Parse("not json".to_owned()).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            status_of(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthError::UserAlreadyExists.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AuthError::WeakPassword("too short".to_owned()).into()),
            StatusCode::BAD_REQUEST
        );
    }
}
