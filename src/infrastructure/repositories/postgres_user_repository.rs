use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::repositories::UserRepository;
use crate::domain::user::{Email, User};

const USER_COLUMNS: &str =
    "id, external_id, name, email, phone, role, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, external_id, name, email, phone, role, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.external_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_external_id(&self, external_id: &str) -> DomainResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1 AND deleted_at IS NULL"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_profile(&self, user: &User) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $1, phone = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(&user.name)
        .bind(&user.phone)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn link_external_id(&self, id: Uuid, external_id: &str) -> DomainResult<()> {
        sqlx::query("UPDATE users SET external_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(external_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
