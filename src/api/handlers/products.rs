use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use super::PageParams;
use crate::api::extract::{ApiPath, ApiQuery, ValidJson};
use crate::api::response::{created, done, ok, ApiResult};
use crate::api::state::AppState;
use crate::domain::catalog::{NewProduct, Product, ProductPatch};

/// Request body for creating a product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(alias = "category_id")]
    pub category_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whole shillings
    pub price: i64,
    pub stock: i32,
}

/// Partial product update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(alias = "category_id")]
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
}

/// POST /api/products/create
pub async fn create_product(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateProductRequest>,
) -> ApiResult<Product> {
    let product = state
        .catalog()
        .create_product(NewProduct {
            category_id: req.category_id,
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
        })
        .await?;

    created("Product created successfully", product)
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Product> {
    let product = state.catalog().get_product(id).await?;
    ok("Product fetched successfully", product)
}

/// GET /api/products?limit=&offset=
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<Product>> {
    let products = state
        .catalog()
        .list_products(params.pagination()?)
        .await?;

    ok("Products fetched successfully", products)
}

/// PATCH /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateProductRequest>,
) -> ApiResult<Product> {
    let patch = ProductPatch {
        category_id: req.category_id,
        name: req.name,
        description: req.description,
        price: req.price,
        stock: req.stock,
    };
    let product = state.catalog().update_product(id, patch).await?;

    ok("Product updated successfully", product)
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.catalog().delete_product(id).await?;
    done("Product deleted successfully")
}
