use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{Pagination, Product};
use crate::domain::errors::DomainResult;

/// Repository trait for products
///
/// Reads never return soft-deleted products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> DomainResult<()>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Product>>;

    /// Newest first
    async fn list(&self, page: Pagination) -> DomainResult<Vec<Product>>;

    async fn update(&self, product: &Product) -> DomainResult<()>;

    /// Mark as deleted; returns false when nothing was live to delete
    async fn soft_delete(&self, id: Uuid) -> DomainResult<bool>;
}
