use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::order::{Order, OrderItem, PlacedOrder};

/// Repository trait for the Order aggregate
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Convert the cart's contents into an order as one atomic unit
    ///
    /// Implementations must lock the cart, read its items, build the order
    /// with [`PlacedOrder::from_cart`], persist the order and its items and
    /// clear the cart, all-or-nothing. Concurrent calls for the same cart
    /// must serialize so the items are only ever ordered once.
    ///
    /// # Errors
    /// * `DomainError::NoCart` - the cart does not exist
    /// * `DomainError::EmptyCart` - the cart has no items
    async fn place_order(&self, cart_id: Uuid, user_id: Uuid) -> DomainResult<PlacedOrder>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Order>>;

    /// Orders of one user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Order>>;

    /// All orders, newest first
    async fn list_all(&self) -> DomainResult<Vec<Order>>;

    async fn items(&self, order_id: Uuid) -> DomainResult<Vec<OrderItem>>;

    /// Persist status and paid flag
    async fn update(&self, order: &Order) -> DomainResult<()>;
}
