use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::order::{Order, OrderStatus, PlacedOrder};
use crate::domain::repositories::OrderRepository;
use crate::domain::user::User;

/// Order reads and the post-checkout lifecycle
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Every order with its items, newest first
    pub async fn list_all(&self) -> DomainResult<Vec<PlacedOrder>> {
        let orders = self.orders.list_all().await?;
        self.with_items(orders).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<PlacedOrder>> {
        let orders = self.orders.find_by_user(user_id).await?;
        self.with_items(orders).await
    }

    /// Customers only see their own orders; staff see all
    pub async fn get(&self, id: Uuid, viewer: &User) -> DomainResult<PlacedOrder> {
        let order = self.load(id).await?;
        if order.user_id() != viewer.id && !viewer.role.is_staff() {
            return Err(DomainError::not_found("Order"));
        }
        self.attach_items(order).await
    }

    /// # Errors
    /// * `DomainError::Forbidden` - actor is not staff
    /// * `DomainError::Validation` - transition not allowed from the current status
    pub async fn update_status(
        &self,
        actor: &User,
        id: Uuid,
        status: OrderStatus,
    ) -> DomainResult<PlacedOrder> {
        require_staff(actor)?;

        let mut order = self.load(id).await?;
        let previous = order.status();
        order.transition_to(status)?;
        self.orders.update(&order).await?;

        tracing::info!(order_id = %id, from = %previous, to = %status, "Order status changed");
        self.attach_items(order).await
    }

    pub async fn set_paid(&self, actor: &User, id: Uuid, paid: bool) -> DomainResult<PlacedOrder> {
        require_staff(actor)?;

        let mut order = self.load(id).await?;
        order.set_paid(paid);
        self.orders.update(&order).await?;

        tracing::info!(order_id = %id, paid, "Order payment flag changed");
        self.attach_items(order).await
    }

    async fn load(&self, id: Uuid) -> DomainResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order"))
    }

    async fn attach_items(&self, order: Order) -> DomainResult<PlacedOrder> {
        let items = self.orders.items(order.id()).await?;
        Ok(PlacedOrder { order, items })
    }

    async fn with_items(&self, orders: Vec<Order>) -> DomainResult<Vec<PlacedOrder>> {
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            result.push(self.attach_items(order).await?);
        }
        Ok(result)
    }
}

fn require_staff(user: &User) -> DomainResult<()> {
    if user.role.is_staff() {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "Only administrators can change orders".to_string(),
        ))
    }
}
