use super::value_objects::OrderStatus;
use crate::domain::cart::CartItem;
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Order aggregate root
///
/// Created once from a cart snapshot at checkout. Afterwards only the
/// status and the paid flag may change.
///
/// # Invariants
/// - `total` equals the sum of price × quantity over its items, fixed at
///   creation time
/// - New orders start `Pending` and unpaid
/// - Status transitions follow [`OrderStatus::can_transition_to`]
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Order {
    id: Uuid,
    user_id: Uuid,
    status: OrderStatus,
    total: i64,
    paid: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A line of an order, copied from the cart at checkout
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order together with its line items
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl PlacedOrder {
    /// Builds a pending order and its items from the cart contents
    ///
    /// Every order and every item receives a fresh id. Item prices are the
    /// cart snapshots, never the live catalog prices.
    ///
    /// # Errors
    /// * `DomainError::EmptyCart` - `items` is empty
    /// * `DomainError::Validation` - a line has a non-positive quantity or
    ///   the total overflows
    ///
    /// # Example
    /// ```
    /// use storefront_api::domain::order::PlacedOrder;
    ///
    /// let result = PlacedOrder::from_cart(uuid::Uuid::new_v4(), &[]);
    /// assert!(result.is_err());
    /// ```
    pub fn from_cart(user_id: Uuid, items: &[CartItem]) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let total = order_total(items)?;
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            user_id,
            status: OrderStatus::Pending,
            total,
            paid: false,
            created_at: now,
            updated_at: now,
        };

        let items = items
            .iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Ok(Self { order, items })
    }
}

/// Sums price × quantity over the cart in integer minor units
///
/// Uses checked arithmetic so an absurd cart fails instead of wrapping.
pub fn order_total(items: &[CartItem]) -> DomainResult<i64> {
    items.iter().try_fold(0i64, |total, item| {
        if item.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "Cart item {} has invalid quantity {}",
                item.id, item.quantity
            )));
        }
        item.price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| DomainError::validation("Order total is too large"))
    })
}

impl Order {
    /// Moves the order to `next` if the transition is allowed
    pub fn transition_to(&mut self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::validation(format!(
                "Cannot move order from {} to {}",
                self.status, next
            )));
        }

        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sets the paid flag
    pub fn set_paid(&mut self, paid: bool) {
        self.paid = paid;
        self.updated_at = Utc::now();
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Total in minor currency units
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn paid(&self) -> bool {
        self.paid
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
