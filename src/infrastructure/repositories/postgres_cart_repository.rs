use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::errors::DomainResult;
use crate::domain::repositories::{CartItemRepository, CartRepository};

/// PostgreSQL implementation of CartRepository
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    async fn find_or_create(&self, user_id: Uuid) -> DomainResult<Cart> {
        let cart = Cart::new(user_id);

        // carts.user_id is unique; a concurrent creator wins and we read theirs
        sqlx::query(
            r#"
            INSERT INTO carts (id, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(cart.id)
        .bind(cart.user_id)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(cart)
    }
}

/// PostgreSQL implementation of CartItemRepository
pub struct PostgresCartItemRepository {
    pool: PgPool,
}

impl PostgresCartItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartItemRepository for PostgresCartItemRepository {
    async fn add(&self, item: &CartItem) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_items (
                id, cart_id, product_id, quantity, price, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id)
        .bind(item.cart_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, cart_id: Uuid) -> DomainResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, product_id, quantity, price, created_at, updated_at
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn exists(&self, cart_id: Uuid, product_id: Uuid) -> DomainResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM cart_items WHERE cart_id = $1 AND product_id = $2)",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_owned(&self, item_id: Uuid, user_id: Uuid) -> DomainResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.price,
                   ci.created_at, ci.updated_at
            FROM cart_items ci
            JOIN carts c ON c.id = ci.cart_id
            WHERE ci.id = $1 AND c.user_id = $2
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update_quantity(&self, item_id: Uuid, quantity: i32) -> DomainResult<()> {
        sqlx::query("UPDATE cart_items SET quantity = $1, updated_at = NOW() WHERE id = $2")
            .bind(quantity)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove(&self, item_id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
