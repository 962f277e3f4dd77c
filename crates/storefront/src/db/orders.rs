//! Order repository: checkout and order history.
//!
//! Checkout is one transaction covering the cart read, the order insert,
//! the line-item snapshot, and the cart clear. Product names and prices
//! are copied into `order_items` at this moment, so later catalog edits
//! never rewrite history. Stock is not decremented here; the back-office
//! sales ledger is the stock-out source of truth.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use piyesa_core::{AddressId, OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithItems};

/// Errors surfaced by checkout beyond plain repository failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user's cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The shipping address does not exist or belongs to another user.
    #[error("address does not belong to user")]
    AddressNotOwned,

    /// Underlying database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    reference: String,
    status: OrderStatus,
    address_id: i32,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            reference: row.reference,
            status: row.status,
            address_id: AddressId::new(row.address_id),
            total: row.total,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    product_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineSnapshot {
    product_id: i32,
    product_name: String,
    unit_price: Decimal,
    quantity: i32,
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the user's cart.
    ///
    /// The whole flow is one transaction: a failure at any step (bad
    /// address, insert error) rolls everything back and the cart is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when the cart has no lines,
    /// `CheckoutError::AddressNotOwned` when the address id does not
    /// belong to the user, and `CheckoutError::Repository` for database
    /// failures.
    pub async fn checkout(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<OrderWithItems, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Ownership check on the shipping address
        let owned = sqlx::query_scalar::<_, i32>(
            r"
            SELECT id FROM addresses WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if owned.is_none() {
            return Err(CheckoutError::AddressNotOwned);
        }

        let lines = sqlx::query_as::<_, CartLineSnapshot>(
            r"
            SELECT ci.product_id, p.name AS product_name, p.price AS unit_price, ci.quantity
            FROM cart_items ci
            JOIN carts c ON ci.cart_id = c.id
            JOIN products p ON ci.product_id = p.id
            WHERE c.user_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total: Decimal = lines
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum();

        let reference = new_order_reference();

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, address_id, reference, status, total)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING id, reference, status, address_id, total, created_at
            ",
        )
        .bind(user_id)
        .bind(address_id)
        .bind(&reference)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let order_id = order_row.id;

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE cart_id IN (SELECT id FROM carts WHERE user_id = $1)
            ",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let items = lines
            .into_iter()
            .map(|l| OrderItem {
                product_id: ProductId::new(l.product_id),
                product_name: l.product_name,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect();

        Ok(OrderWithItems {
            order: order_row.into(),
            items,
        })
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, reference, status, address_id, total, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Fetch one of the user's orders with its items.
    ///
    /// Returns `None` for unknown ids and for orders owned by another
    /// user; the route treats both as 404.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, reference, status, address_id, total, created_at
            FROM orders
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT product_id, product_name, quantity, unit_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems {
            order: row.into(),
            items: items.into_iter().map(OrderItem::from).collect(),
        }))
    }
}

/// Generate an order reference: `PY-` plus 12 hex characters from a v4
/// UUID. Collisions are guarded by the UNIQUE constraint on the column.
fn new_order_reference() -> String {
    let hex: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(12)
        .collect();
    format!("PY-{}", hex.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_reference_shape() {
        let reference = new_order_reference();
        assert!(reference.starts_with("PY-"));
        assert_eq!(reference.len(), 15);
        assert!(
            reference
                .chars()
                .skip(3)
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_order_references_are_unique_enough() {
        let a = new_order_reference();
        let b = new_order_reference();
        assert_ne!(a, b);
    }
}
