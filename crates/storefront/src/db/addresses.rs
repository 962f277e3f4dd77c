//! Address directory repository.
//!
//! Owns the single-default invariant: for a given user, at most one
//! address row has `is_default = TRUE`. The invariant is preserved by
//! running every default change as one transaction that first clears the
//! user's defaults unconditionally and then flips the target row. The
//! bulk clear takes row locks on all of the user's addresses, so
//! concurrent default changes for the same user serialize at the store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use piyesa_core::{AddressId, ApprovedAddressId, UserId};

use super::{RepositoryError, map_fk_violation};
use crate::models::Address;

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    approved_address_id: Option<i32>,
    label: String,
    contact_name: String,
    phone: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            approved_address_id: row.approved_address_id.map(ApprovedAddressId::new),
            label: row.label,
            contact_name: row.contact_name,
            phone: row.phone,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

/// Parameters for creating an address.
///
/// Exactly one of `approved_address_id` / `street_line` carries the
/// location; the table CHECK rejects rows with neither.
#[derive(Debug)]
pub struct NewAddress {
    pub user_id: UserId,
    pub approved_address_id: Option<ApprovedAddressId>,
    pub street_line: Option<String>,
    pub contact_name: String,
    pub phone: String,
    pub is_default: bool,
}

/// Repository for the user-owned address directory.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's addresses: default first, then newest first.
    ///
    /// The label resolves to the approved address street line when one is
    /// referenced, else the free-form street line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT a.id,
                   a.approved_address_id,
                   COALESCE(aa.street_line, a.street_line, '') AS label,
                   a.contact_name,
                   a.phone,
                   a.is_default,
                   a.created_at
            FROM addresses a
            LEFT JOIN approved_addresses aa ON a.approved_address_id = aa.id
            WHERE a.user_id = $1
            ORDER BY a.is_default DESC, a.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Fetch one address, ownership-checked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT a.id,
                   a.approved_address_id,
                   COALESCE(aa.street_line, a.street_line, '') AS label,
                   a.contact_name,
                   a.phone,
                   a.is_default,
                   a.created_at
            FROM addresses a
            LEFT JOIN approved_addresses aa ON a.approved_address_id = aa.id
            WHERE a.id = $1 AND a.user_id = $2
            ",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Create an address.
    ///
    /// When `is_default` is set, the insert runs inside the same
    /// clear-then-set transaction as [`set_default`](Self::set_default),
    /// so the new row becomes the only default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when `approved_address_id`
    /// references a row that does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewAddress) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if new.is_default {
            sqlx::query(
                r"
                UPDATE addresses SET is_default = FALSE
                WHERE user_id = $1
                ",
            )
            .bind(new.user_id)
            .execute(&mut *tx)
            .await?;
        }

        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO addresses
                (user_id, approved_address_id, street_line, contact_name, phone, is_default)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(new.user_id)
        .bind(new.approved_address_id)
        .bind(&new.street_line)
        .bind(&new.contact_name)
        .bind(&new.phone)
        .bind(new.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_fk_violation(e, "approved address does not exist"))?;

        tx.commit().await?;

        let created = self
            .get_owned(AddressId::new(id), new.user_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(created)
    }

    /// Change an address's default flag, preserving the single-default
    /// invariant.
    ///
    /// Runs as one transaction:
    ///
    /// 1. When `make_default` is true, clear `is_default` on every row the
    ///    user owns. The clear includes the target row; excluding it buys
    ///    nothing and complicates the statement.
    /// 2. Set `is_default = make_default` on the row matching both the
    ///    address id and the user id. Filtering on both columns is what
    ///    enforces ownership; an id belonging to another user matches
    ///    nothing.
    ///
    /// # Returns
    ///
    /// `true` when the target row matched, `false` when the id did not
    /// exist or belongs to another user. Callers keep the external
    /// contract (success either way) and log the distinction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back, so a half-applied state (two defaults, or
    /// none where one existed) is never visible.
    pub async fn set_default(
        &self,
        user_id: UserId,
        address_id: AddressId,
        make_default: bool,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if make_default {
            sqlx::query(
                r"
                UPDATE addresses SET is_default = FALSE
                WHERE user_id = $1
                ",
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let result = sqlx::query(
            r"
            UPDATE addresses SET is_default = $1
            WHERE id = $2 AND user_id = $3
            ",
        )
        .bind(make_default)
        .bind(address_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an address the user owns.
    ///
    /// # Returns
    ///
    /// `true` when a row was deleted, `false` when the id did not exist
    /// or belongs to another user (idempotent no-op either way).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the address is still
    /// referenced by an order.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM addresses
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(address_id)
        .bind(user_id)
        .execute(self.pool)
        .await
        .map_err(|e| map_fk_violation(e, "address is referenced by an order"))?;

        Ok(result.rows_affected() > 0)
    }
}
