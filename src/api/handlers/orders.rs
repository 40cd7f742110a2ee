use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::extract::{ApiPath, ValidJson};
use crate::api::middleware::CurrentUser;
use crate::api::response::{created, ok, ApiResult};
use crate::api::state::AppState;
use crate::domain::order::{OrderItem, OrderStatus, PlacedOrder};

/// Order with its line items
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total: i64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl From<PlacedOrder> for OrderResponse {
    fn from(placed: PlacedOrder) -> Self {
        let order = placed.order;
        Self {
            id: order.id(),
            user_id: order.user_id(),
            status: order.status(),
            total: order.total(),
            paid: order.paid(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            items: placed.items,
        }
    }
}

fn responses(orders: Vec<PlacedOrder>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaidRequest {
    pub paid: bool,
}

/// Check out the caller's cart
///
/// POST /api/orders/create
pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<OrderResponse> {
    let placed = state.checkout().place_order(&user).await?;
    created("Order created successfully", OrderResponse::from(placed))
}

/// GET /api/orders
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<OrderResponse>> {
    let orders = state.orders().list_all().await?;
    ok("Orders fetched successfully", responses(orders))
}

/// GET /api/orders/mine
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<OrderResponse>> {
    let orders = state.orders().list_for_user(user.id).await?;
    ok("Orders fetched successfully", responses(orders))
}

/// GET /api/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<OrderResponse> {
    let placed = state.orders().get(id, &user).await?;
    ok("Order fetched successfully", OrderResponse::from(placed))
}

/// PATCH /api/orders/:id/status (admin)
pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateStatusRequest>,
) -> ApiResult<OrderResponse> {
    let placed = state.orders().update_status(&user, id, req.status).await?;
    ok("Order status updated", OrderResponse::from(placed))
}

/// PATCH /api/orders/:id/paid (admin)
pub async fn update_paid(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdatePaidRequest>,
) -> ApiResult<OrderResponse> {
    let placed = state.orders().set_paid(&user, id, req.paid).await?;
    ok("Order payment status updated", OrderResponse::from(placed))
}
