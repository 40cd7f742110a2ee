use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::category::normalize_name;
use crate::domain::errors::{DomainError, DomainResult};

/// Sellable product
///
/// # Invariants
/// - `price` is in minor currency units and never negative
/// - `stock` is never negative
/// - `name` is stored lower-cased
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i32,
}

/// Partial update for a product; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
}

impl Product {
    pub fn new(input: NewProduct) -> DomainResult<Self> {
        validate_price(input.price)?;
        validate_stock(input.stock)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            category_id: input.category_id,
            name: normalize_name(&input.name)?,
            description: input.description.trim().to_string(),
            price: input.price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Applies the supplied fields of `patch`
    ///
    /// All fields are validated before any is written, so a rejected patch
    /// leaves the product unchanged.
    pub fn apply(&mut self, patch: ProductPatch) -> DomainResult<()> {
        let name = patch.name.as_deref().map(normalize_name).transpose()?;
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        if let Some(stock) = patch.stock {
            validate_stock(stock)?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

fn validate_price(price: i64) -> DomainResult<()> {
    if price < 0 {
        return Err(DomainError::validation("Price cannot be negative"));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> DomainResult<()> {
    if stock < 0 {
        return Err(DomainError::validation("Stock cannot be negative"));
    }
    Ok(())
}
