use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{Category, Pagination};
use crate::domain::errors::DomainResult;

/// Repository trait for product categories
///
/// Reads never return soft-deleted categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> DomainResult<()>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Category>>;

    /// Newest first
    async fn list(&self, page: Pagination) -> DomainResult<Vec<Category>>;

    /// Overwrite name and parent
    async fn update(&self, category: &Category) -> DomainResult<()>;

    /// Mark as deleted; returns false when nothing was live to delete
    async fn soft_delete(&self, id: Uuid) -> DomainResult<bool>;
}
