//! Registration and login handlers.
//!
//! No sessions or tokens here; a successful login hands back the user id
//! and clients pass it as `userId` on subsequent calls.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use piyesa_core::{Email, UserId};

use crate::error::Result;
use crate::services::auth::AuthService;
use crate::state::AppState;

use super::DataBody;

/// Credentials for register and login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated user as returned to clients.
#[derive(Debug, Serialize)]
pub struct AuthUserBody {
    pub id: UserId,
    pub email: Email,
}

/// Create an account.
///
/// # Errors
///
/// Returns 400 for an invalid email or weak password, 409 when the email
/// already has an account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<DataBody<AuthUserBody>>> {
    let user = AuthService::new(state.pool())
        .register_with_password(&body.email, &body.password)
        .await?;

    Ok(Json(DataBody::new(AuthUserBody {
        id: user.id,
        email: user.email,
    })))
}

/// Verify credentials.
///
/// # Errors
///
/// Returns 401 with a generic message for any credential failure; the
/// response never distinguishes an unknown email from a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<DataBody<AuthUserBody>>> {
    let user = AuthService::new(state.pool())
        .login_with_password(&body.email, &body.password)
        .await?;

    Ok(Json(DataBody::new(AuthUserBody {
        id: user.id,
        email: user.email,
    })))
}
