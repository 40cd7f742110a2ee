use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::cart::CartItem;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::order::{Order, OrderItem, PlacedOrder};
use crate::domain::repositories::OrderRepository;

const ORDER_COLUMNS: &str = "id, user_id, status, total, paid, created_at, updated_at";

/// PostgreSQL implementation of OrderRepository
///
/// Checkout runs in a single transaction holding a row lock on the cart, so
/// the order, its items and the cart clearing commit or roll back together.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn place_order(&self, cart_id: Uuid, user_id: Uuid) -> DomainResult<PlacedOrder> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent checkouts of the same cart
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM carts WHERE id = $1 FOR UPDATE")
                .bind(cart_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(DomainError::NoCart);
        }

        let cart_items = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, product_id, quantity, price, created_at, updated_at
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        let placed = PlacedOrder::from_cart(user_id, &cart_items)?;
        let order = &placed.order;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, status, total, paid, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id())
        .bind(order.user_id())
        .bind(order.status())
        .bind(order.total())
        .bind(order.paid())
        .bind(order.created_at())
        .bind(order.updated_at())
        .execute(&mut *tx)
        .await?;

        let mut insert_items = QueryBuilder::<Postgres>::new(
            "INSERT INTO order_items (id, order_id, product_id, quantity, price, created_at, updated_at) ",
        );
        insert_items.push_values(&placed.items, |mut row, item| {
            row.push_bind(item.id)
                .push_bind(item.order_id)
                .push_bind(item.product_id)
                .push_bind(item.quantity)
                .push_bind(item.price)
                .push_bind(item.created_at)
                .push_bind(item.updated_at);
        });
        insert_items.build().execute(&mut *tx).await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(placed)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    async fn list_all(&self) -> DomainResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC");
        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    async fn items(&self, order_id: Uuid) -> DomainResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, price, created_at, updated_at
            FROM order_items
            WHERE order_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn update(&self, order: &Order) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, paid = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(order.status())
        .bind(order.paid())
        .bind(order.updated_at())
        .bind(order.id())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Order {}", order.id())));
        }

        Ok(())
    }
}
