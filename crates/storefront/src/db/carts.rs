//! Cart repository.
//!
//! Carts are created lazily on first touch (one per user, enforced by a
//! UNIQUE constraint). Line writes are ownership-scoped by joining
//! through the user's cart, mirroring the address directory's
//! (id, user_id) discipline: a line id belonging to another user's cart
//! matches nothing and the write is a no-op.

use rust_decimal::Decimal;
use sqlx::PgPool;

use piyesa_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    product_id: i32,
    product_name: String,
    unit_price: Decimal,
    quantity: i32,
}

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart id, creating the cart when the user has none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create_cart_id(&self, user_id: UserId) -> Result<CartId, RepositoryError> {
        // ON CONFLICT with a no-op update still returns the row, so one
        // round trip covers both the existing and the fresh cart.
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW()
            RETURNING id
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(CartId::new(id))
    }

    /// Load the user's cart with items and line totals, creating it when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let cart_id = self.get_or_create_cart_id(user_id).await?;

        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.id, ci.product_id, p.name AS product_name, p.price AS unit_price,
                   ci.quantity
            FROM cart_items ci
            JOIN products p ON ci.product_id = p.id
            WHERE ci.cart_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        let items: Vec<CartItem> = rows
            .into_iter()
            .map(|r| {
                let line_total = r.unit_price * Decimal::from(r.quantity);
                CartItem {
                    id: CartItemId::new(r.id),
                    product_id: ProductId::new(r.product_id),
                    product_name: r.product_name,
                    unit_price: r.unit_price,
                    quantity: r.quantity,
                    line_total,
                }
            })
            .collect();

        let subtotal = items.iter().map(|i| i.line_total).sum();

        Ok(Cart {
            id: cart_id,
            items,
            subtotal,
        })
    }

    /// Add a product to the user's cart.
    ///
    /// Adding a product already in the cart accumulates the quantity via
    /// the line's unique (`cart_id`, `product_id`) constraint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the product does not
    /// exist or is inactive.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let active = sqlx::query_scalar::<_, bool>(
            r"
            SELECT is_active FROM products WHERE id = $1
            ",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        if active != Some(true) {
            return Err(RepositoryError::NotFound);
        }

        let cart_id = self.get_or_create_cart_id(user_id).await?;

        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set a cart line's quantity.
    ///
    /// # Returns
    ///
    /// `true` when the line belonged to the user's cart and was updated,
    /// `false` for an unknown or non-owned line (no-op).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_item_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items ci
            SET quantity = $1
            FROM carts c
            WHERE ci.id = $2 AND ci.cart_id = c.id AND c.user_id = $3
            ",
        )
        .bind(quantity)
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a cart line.
    ///
    /// # Returns
    ///
    /// `true` when a line was removed, `false` for an unknown or
    /// non-owned line (idempotent no-op).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items ci
            USING carts c
            WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
            ",
        )
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
