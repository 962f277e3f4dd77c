//! Address directory handlers.
//!
//! The PATCH handler is where the single-default invariant is exposed
//! over HTTP. Write endpoints are deliberately no-op tolerant: a target
//! that does not exist or belongs to another user produces the same
//! `{"ok": true}` as a real update, and only the server-side log records
//! the difference.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use piyesa_core::{AddressId, ApprovedAddressId, UserId};

use crate::db::addresses::{AddressRepository, NewAddress};
use crate::error::{AppError, Result};
use crate::models::Address;
use crate::params;
use crate::state::AppState;

use super::{DataBody, OkBody};

/// Body for creating an address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub user_id: i32,
    pub approved_address_id: Option<i32>,
    pub street_line: Option<String>,
    pub contact_name: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Body for the default-flag update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    pub user_id: i32,
    pub is_default: bool,
}

/// List a user's addresses, default first, then newest first.
///
/// # Errors
///
/// Returns `AppError::Validation` when `userId` is missing or malformed.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<DataBody<Vec<Address>>>> {
    let user_id: UserId = params::positive_id(query.get("userId").map(String::as_str), "userId")?;

    let addresses = AddressRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(DataBody::new(addresses)))
}

/// Create an address.
///
/// The location is either a reference to an approved address or a
/// free-form street line; a body carrying neither is rejected before the
/// insert. When `isDefault` is set the repository runs the same
/// clear-then-set transaction as the PATCH path, so the new row arrives
/// as the only default.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed ids or a missing
/// location, `AppError::Conflict` when `approvedAddressId` references a
/// row that does not exist.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAddressRequest>,
) -> Result<Json<DataBody<Address>>> {
    let user_id: UserId = params::body_id(body.user_id, "userId")?;
    let approved_address_id: Option<ApprovedAddressId> = body
        .approved_address_id
        .map(|raw| params::body_id(raw, "approvedAddressId"))
        .transpose()?;

    let street_line = body
        .street_line
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    if approved_address_id.is_none() && street_line.is_none() {
        return Err(AppError::Validation(
            "Either approvedAddressId or streetLine is required".to_owned(),
        ));
    }

    let contact_name = body.contact_name.trim();
    if contact_name.is_empty() {
        return Err(AppError::Validation("Invalid contactName".to_owned()));
    }
    let phone = body.phone.trim();
    if phone.is_empty() {
        return Err(AppError::Validation("Invalid phone".to_owned()));
    }

    let address = AddressRepository::new(state.pool())
        .create(NewAddress {
            user_id,
            approved_address_id,
            street_line,
            contact_name: contact_name.to_owned(),
            phone: phone.to_owned(),
            is_default: body.is_default,
        })
        .await?;

    Ok(Json(DataBody::new(address)))
}

/// Set or clear an address's default flag.
///
/// Runs the clear-then-set transaction in the repository. An id that
/// does not exist or belongs to another user matches zero rows; the
/// caller still gets `{"ok": true}`, and the miss is recorded in the log
/// for audit.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed ids.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateAddressRequest>,
) -> Result<Json<OkBody>> {
    let address_id: AddressId = params::path_id(&id, "id")?;
    let user_id: UserId = params::body_id(body.user_id, "userId")?;

    let matched = AddressRepository::new(state.pool())
        .set_default(user_id, address_id, body.is_default)
        .await?;

    if matched {
        tracing::info!(
            user_id = %user_id,
            address_id = %address_id,
            is_default = body.is_default,
            "Address default flag updated"
        );
    } else {
        tracing::info!(
            user_id = %user_id,
            address_id = %address_id,
            "Address default update matched no rows"
        );
    }

    Ok(Json(OkBody::new()))
}

/// Delete an address the user owns.
///
/// Idempotent: an unknown or non-owned id is a silent no-op and the
/// response is `{"ok": true}` either way.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed ids, `AppError::Conflict`
/// when the address is still referenced by an order.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<OkBody>> {
    let address_id: AddressId = params::path_id(&id, "id")?;
    let user_id: UserId = params::positive_id(query.get("userId").map(String::as_str), "userId")?;

    let deleted = AddressRepository::new(state.pool())
        .delete(address_id, user_id)
        .await?;

    if !deleted {
        tracing::info!(
            user_id = %user_id,
            address_id = %address_id,
            "Address delete matched no rows"
        );
    }

    Ok(Json(OkBody::new()))
}
