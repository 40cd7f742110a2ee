use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::user::{Email, User};

/// Repository trait for local user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &User) -> DomainResult<()>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>>;

    /// Find a user by the identity provider's subject id
    async fn find_by_external_id(&self, external_id: &str) -> DomainResult<Option<User>>;

    /// Persist name and phone changes
    async fn update_profile(&self, user: &User) -> DomainResult<()>;

    /// Point an existing account at a new provider subject id
    async fn link_external_id(&self, id: Uuid, external_id: &str) -> DomainResult<()>;
}
