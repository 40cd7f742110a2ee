use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::cart::{validate_quantity, CartItem};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::{CartItemRepository, CartRepository, ProductRepository};

/// The caller's cart as returned by `GET /cart`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// `None` until the first item is added
    pub cart_id: Option<Uuid>,
    pub items: Vec<CartItem>,
}

/// Cart mutation rules
///
/// Every operation is scoped to the calling user: an item in someone
/// else's cart is indistinguishable from a missing one.
#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    items: Arc<dyn CartItemRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        items: Arc<dyn CartItemRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            carts,
            items,
            products,
        }
    }

    /// Adds a product line, creating the cart on first use
    ///
    /// # Errors
    /// * `DomainError::Validation` - quantity is not positive
    /// * `DomainError::NotFound` - product missing or soft-deleted
    /// * `DomainError::Conflict` - product already in the cart
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> DomainResult<CartItem> {
        validate_quantity(quantity)?;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product"))?;

        let cart = self.carts.find_or_create(user_id).await?;
        if self.items.exists(cart.id, product.id).await? {
            return Err(DomainError::conflict("Product already in cart"));
        }

        let item = CartItem::new(cart.id, &product, quantity)?;
        self.items.add(&item).await?;

        tracing::debug!(cart_id = %cart.id, product_id = %product.id, "Item added to cart");
        Ok(item)
    }

    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> DomainResult<()> {
        let item = self.owned_item(user_id, item_id).await?;
        self.items.remove(item.id).await
    }

    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> DomainResult<CartItem> {
        validate_quantity(quantity)?;

        let mut item = self.owned_item(user_id, item_id).await?;
        self.items.update_quantity(item.id, quantity).await?;
        item.quantity = quantity;
        Ok(item)
    }

    /// Reads never create a cart
    pub async fn view(&self, user_id: Uuid) -> DomainResult<CartView> {
        match self.carts.find_by_user(user_id).await? {
            Some(cart) => Ok(CartView {
                cart_id: Some(cart.id),
                items: self.items.list(cart.id).await?,
            }),
            None => Ok(CartView {
                cart_id: None,
                items: Vec::new(),
            }),
        }
    }

    async fn owned_item(&self, user_id: Uuid, item_id: Uuid) -> DomainResult<CartItem> {
        self.items
            .find_owned(item_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cart item"))
    }
}
