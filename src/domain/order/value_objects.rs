use serde::{Deserialize, Serialize};
use std::fmt;

/// Fulfilment status of an order
///
/// # Status Transitions
/// ```text
/// Pending -> Shipped -> Delivered
///    └-----> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting shipment
    Pending,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Withdrawn before shipping
    Cancelled,
}

impl OrderStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use storefront_api::domain::order::OrderStatus;
    ///
    /// assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
    /// assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
    /// ```
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Shipped) | (Pending, Cancelled) | (Shipped, Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}
