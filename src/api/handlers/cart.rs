use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::extract::{ApiPath, ValidJson};
use crate::api::middleware::CurrentUser;
use crate::api::response::{created, done, ok, ApiResult};
use crate::api::state::AppState;
use crate::domain::cart::CartItem;
use crate::services::CartView;

/// Request body for adding a product to the cart
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(alias = "product_id")]
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Request body for changing a line's quantity
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// POST /api/cart/create
pub async fn add_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(req): ValidJson<AddItemRequest>,
) -> ApiResult<CartItem> {
    let item = state
        .cart()
        .add_item(user.id, req.product_id, req.quantity)
        .await?;

    created("Item added to cart", item)
}

/// DELETE /api/cart/remove/:id
pub async fn remove_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.cart().remove_item(user.id, id).await?;
    done("Item removed from cart")
}

/// GET /api/cart
pub async fn view_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<CartView> {
    let view = state.cart().view(user.id).await?;
    ok("Cart fetched successfully", view)
}

/// PATCH /api/cart/update/quantity/:id
pub async fn update_quantity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateQuantityRequest>,
) -> ApiResult<CartItem> {
    let item = state
        .cart()
        .update_quantity(user.id, id, req.quantity)
        .await?;

    ok("Quantity updated", item)
}
