use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::errors::DomainResult;

/// Repository trait for carts
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Find the cart owned by a user
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Option<Cart>>;

    /// Return the user's cart, creating it if none exists yet
    async fn find_or_create(&self, user_id: Uuid) -> DomainResult<Cart>;
}

/// Repository trait for cart line items
#[async_trait]
pub trait CartItemRepository: Send + Sync {
    /// Insert an item; a second line for the same product is a conflict
    async fn add(&self, item: &CartItem) -> DomainResult<()>;

    async fn list(&self, cart_id: Uuid) -> DomainResult<Vec<CartItem>>;

    async fn exists(&self, cart_id: Uuid, product_id: Uuid) -> DomainResult<bool>;

    /// Find an item only if it sits in a cart owned by `user_id`
    async fn find_owned(&self, item_id: Uuid, user_id: Uuid) -> DomainResult<Option<CartItem>>;

    async fn update_quantity(&self, item_id: Uuid, quantity: i32) -> DomainResult<()>;

    async fn remove(&self, item_id: Uuid) -> DomainResult<()>;
}
