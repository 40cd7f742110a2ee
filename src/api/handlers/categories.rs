use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use super::PageParams;
use crate::api::extract::{ApiPath, ApiQuery, ValidJson};
use crate::api::response::{created, done, ok, ApiResult};
use crate::api::state::AppState;
use crate::domain::catalog::{Category, CategoryPatch};

/// Request body for creating a category
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(alias = "parent_id")]
    pub parent_id: Option<Uuid>,
}

/// Partial category update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(alias = "parent_id")]
    pub parent_id: Option<Uuid>,
}

/// POST /api/products/categories/create
pub async fn create_category(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateCategoryRequest>,
) -> ApiResult<Category> {
    let category = state
        .catalog()
        .create_category(&req.name, req.parent_id)
        .await?;

    created("Category created successfully", category)
}

/// GET /api/products/categories?limit=&offset=
pub async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<Category>> {
    let categories = state
        .catalog()
        .list_categories(params.pagination()?)
        .await?;

    ok("Categories fetched successfully", categories)
}

/// GET /api/products/categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Category> {
    let category = state.catalog().get_category(id).await?;
    ok("Category fetched successfully", category)
}

/// PATCH /api/products/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    let patch = CategoryPatch {
        name: req.name,
        parent_id: req.parent_id,
    };
    let category = state.catalog().update_category(id, patch).await?;

    ok("Category updated successfully", category)
}

/// DELETE /api/products/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.catalog().delete_category(id).await?;
    done("Category deleted successfully")
}
