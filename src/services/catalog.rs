use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{Category, CategoryPatch, NewProduct, Pagination, Product, ProductPatch};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::{CategoryRepository, ProductRepository};

/// Category tree and product operations
#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            categories,
            products,
        }
    }

    pub async fn create_category(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> DomainResult<Category> {
        let category = Category::new(name, parent_id)?;
        if let Some(parent_id) = parent_id {
            self.require_parent(parent_id).await?;
        }

        self.categories.create(&category).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn list_categories(&self, page: Pagination) -> DomainResult<Vec<Category>> {
        self.categories.list(page).await
    }

    pub async fn get_category(&self, id: Uuid) -> DomainResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category"))
    }

    /// Partial update; a new parent must exist and must not sit below the
    /// category in the tree
    pub async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> DomainResult<Category> {
        let mut category = self.get_category(id).await?;

        if let Some(parent_id) = patch.parent_id {
            self.require_parent(parent_id).await?;
            self.reject_cycle(category.id, parent_id).await?;
        }

        category.apply(patch)?;
        self.categories.update(&category).await?;
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> DomainResult<()> {
        if !self.categories.soft_delete(id).await? {
            return Err(DomainError::not_found("Category"));
        }
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    pub async fn create_product(&self, input: NewProduct) -> DomainResult<Product> {
        let product = Product::new(input)?;
        self.require_category(product.category_id).await?;

        self.products.create(&product).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> DomainResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product"))
    }

    pub async fn list_products(&self, page: Pagination) -> DomainResult<Vec<Product>> {
        self.products.list(page).await
    }

    pub async fn update_product(&self, id: Uuid, patch: ProductPatch) -> DomainResult<Product> {
        let mut product = self.get_product(id).await?;
        if let Some(category_id) = patch.category_id {
            self.require_category(category_id).await?;
        }

        product.apply(patch)?;
        self.products.update(&product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> DomainResult<()> {
        if !self.products.soft_delete(id).await? {
            return Err(DomainError::not_found("Product"));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    async fn require_category(&self, id: Uuid) -> DomainResult<()> {
        match self.categories.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::validation("Category does not exist")),
        }
    }

    async fn require_parent(&self, id: Uuid) -> DomainResult<()> {
        match self.categories.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::validation("Parent category does not exist")),
        }
    }

    /// Walks up from `new_parent`; meeting `category_id` means the move
    /// would close a loop
    async fn reject_cycle(&self, category_id: Uuid, new_parent: Uuid) -> DomainResult<()> {
        let mut seen = HashSet::new();
        let mut cursor = Some(new_parent);

        while let Some(id) = cursor {
            if id == category_id {
                return Err(DomainError::validation(
                    "A category cannot be moved below itself",
                ));
            }
            if !seen.insert(id) {
                break;
            }
            cursor = self
                .categories
                .find_by_id(id)
                .await?
                .and_then(|c| c.parent_id);
        }
        Ok(())
    }
}
