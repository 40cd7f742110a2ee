use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::{Pagination, Product};
use crate::domain::errors::DomainResult;
use crate::domain::repositories::ProductRepository;

/// PostgreSQL implementation of ProductRepository
///
/// Soft-deleted rows stay in `products` with `deleted_at` set and are
/// filtered out of every read.
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: &Product) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, category_id, name, description, price, stock, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, category_id, name, description, price, stock,
                   created_at, updated_at, deleted_at
            FROM products
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list(&self, page: Pagination) -> DomainResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, category_id, name, description, price, stock,
                   created_at, updated_at, deleted_at
            FROM products
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn update(&self, product: &Product) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE products
            SET category_id = $1, name = $2, description = $3,
                price = $4, stock = $5, updated_at = $6
            WHERE id = $7 AND deleted_at IS NULL
            "#,
        )
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.updated_at)
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
