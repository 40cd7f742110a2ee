// Cart domain module
// A user's single in-progress cart and its line items

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::errors::{DomainError, DomainResult};

/// A user's cart; at most one exists per user
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A product line in a cart
///
/// `price` is the product price captured when the item was added, not the
/// live catalog price.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a line for `product`, snapshotting its current price
    pub fn new(cart_id: Uuid, product: &Product, quantity: i32) -> DomainResult<Self> {
        validate_quantity(quantity)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            cart_id,
            product_id: product.id,
            quantity,
            price: product.price,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Rejects quantities that are zero or negative
pub fn validate_quantity(quantity: i32) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("Quantity must be greater than zero"));
    }
    Ok(())
}
