use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::catalog::{Category, Pagination, Product};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::order::{Order, OrderItem, PlacedOrder};
use crate::domain::repositories::{
    CartItemRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use crate::domain::user::{Email, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
    carts: HashMap<Uuid, Cart>,
    cart_items: HashMap<Uuid, CartItem>,
    orders: HashMap<Uuid, Order>,
    order_items: HashMap<Uuid, OrderItem>,
}

/// Process-local store implementing every repository trait
///
/// Mirrors the PostgreSQL adapters' semantics (soft deletes, uniqueness,
/// atomic checkout) behind a single lock. Used as the substitutable fake in
/// tests and for running the API without a database.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw product row, including soft-deleted ones
    pub async fn product_row(&self, id: Uuid) -> Option<Product> {
        self.tables.read().await.products.get(&id).cloned()
    }

    /// Raw category row, including soft-deleted ones
    pub async fn category_row(&self, id: Uuid) -> Option<Category> {
        self.tables.read().await.categories.get(&id).cloned()
    }

    /// Number of orders stored, regardless of owner
    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Number of order items stored, regardless of order
    pub async fn order_item_count(&self) -> usize {
        self.tables.read().await.order_items.len()
    }
}

fn newest_first<T, F>(rows: &mut [T], created_at: F)
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
}

fn page<T>(rows: Vec<T>, page: Pagination) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .users
            .values()
            .any(|u| u.email == user.email || u.external_id == user.external_id);
        if duplicate {
            return Err(DomainError::conflict("Duplicate entry: user already exists"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(&id)
            .filter(|u| u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email == email.as_str() && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> DomainResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.external_id == external_id && u.deleted_at.is_none())
            .cloned())
    }

    async fn update_profile(&self, user: &User) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.users.get_mut(&user.id) {
            stored.name = user.name.clone();
            stored.phone = user.phone.clone();
            stored.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn link_external_id(&self, id: Uuid, external_id: &str) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.id != id && u.external_id == external_id) {
            return Err(DomainError::conflict("Duplicate entry: user already exists"));
        }
        if let Some(stored) = tables.users.get_mut(&id) {
            stored.external_id = external_id.to_string();
            stored.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create(&self, category: &Category) -> DomainResult<()> {
        self.tables
            .write()
            .await
            .categories
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .get(&id)
            .filter(|c| !c.is_deleted())
            .cloned())
    }

    async fn list(&self, window: Pagination) -> DomainResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| !c.is_deleted())
            .cloned()
            .collect();
        newest_first(&mut rows, |c| c.created_at);
        Ok(page(rows, window))
    }

    async fn update(&self, category: &Category) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.categories.get_mut(&category.id) {
            if !stored.is_deleted() {
                stored.name = category.name.clone();
                stored.parent_id = category.parent_id;
                stored.updated_at = category.updated_at;
            }
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> DomainResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.categories.get_mut(&id) {
            Some(category) if !category.is_deleted() => {
                let now = Utc::now();
                category.deleted_at = Some(now);
                category.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: &Product) -> DomainResult<()> {
        self.tables
            .write()
            .await
            .products
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .get(&id)
            .filter(|p| !p.is_deleted())
            .cloned())
    }

    async fn list(&self, window: Pagination) -> DomainResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Product> = tables
            .products
            .values()
            .filter(|p| !p.is_deleted())
            .cloned()
            .collect();
        newest_first(&mut rows, |p| p.created_at);
        Ok(page(rows, window))
    }

    async fn update(&self, product: &Product) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.products.get_mut(&product.id) {
            if !stored.is_deleted() {
                *stored = product.clone();
            }
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> DomainResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.products.get_mut(&id) {
            Some(product) if !product.is_deleted() => {
                let now = Utc::now();
                product.deleted_at = Some(now);
                product.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CartRepository for InMemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Option<Cart>> {
        let tables = self.tables.read().await;
        Ok(tables.carts.values().find(|c| c.user_id == user_id).cloned())
    }

    async fn find_or_create(&self, user_id: Uuid) -> DomainResult<Cart> {
        let mut tables = self.tables.write().await;
        if let Some(cart) = tables.carts.values().find(|c| c.user_id == user_id) {
            return Ok(cart.clone());
        }
        let cart = Cart::new(user_id);
        tables.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }
}

#[async_trait]
impl CartItemRepository for InMemoryStore {
    async fn add(&self, item: &CartItem) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .cart_items
            .values()
            .any(|i| i.cart_id == item.cart_id && i.product_id == item.product_id);
        if duplicate {
            return Err(DomainError::conflict("Duplicate entry: product already in cart"));
        }
        tables.cart_items.insert(item.id, item.clone());
        Ok(())
    }

    async fn list(&self, cart_id: Uuid) -> DomainResult<Vec<CartItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<CartItem> = tables
            .cart_items
            .values()
            .filter(|i| i.cart_id == cart_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    async fn exists(&self, cart_id: Uuid, product_id: Uuid) -> DomainResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .cart_items
            .values()
            .any(|i| i.cart_id == cart_id && i.product_id == product_id))
    }

    async fn find_owned(&self, item_id: Uuid, user_id: Uuid) -> DomainResult<Option<CartItem>> {
        let tables = self.tables.read().await;
        Ok(tables
            .cart_items
            .get(&item_id)
            .filter(|item| {
                tables
                    .carts
                    .get(&item.cart_id)
                    .is_some_and(|cart| cart.user_id == user_id)
            })
            .cloned())
    }

    async fn update_quantity(&self, item_id: Uuid, quantity: i32) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(item) = tables.cart_items.get_mut(&item_id) {
            item.quantity = quantity;
            item.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn remove(&self, item_id: Uuid) -> DomainResult<()> {
        self.tables.write().await.cart_items.remove(&item_id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn place_order(&self, cart_id: Uuid, user_id: Uuid) -> DomainResult<PlacedOrder> {
        // The write lock plays the role of the cart row lock
        let mut tables = self.tables.write().await;
        if !tables.carts.contains_key(&cart_id) {
            return Err(DomainError::NoCart);
        }

        let mut cart_items: Vec<CartItem> = tables
            .cart_items
            .values()
            .filter(|i| i.cart_id == cart_id)
            .cloned()
            .collect();
        cart_items.sort_by_key(|i| i.created_at);

        let placed = PlacedOrder::from_cart(user_id, &cart_items)?;

        tables
            .orders
            .insert(placed.order.id(), placed.order.clone());
        for item in &placed.items {
            tables.order_items.insert(item.id, item.clone());
        }
        tables.cart_items.retain(|_, item| item.cart_id != cart_id);

        Ok(placed)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect();
        newest_first(&mut orders, |o| o.created_at());
        Ok(orders)
    }

    async fn list_all(&self) -> DomainResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables.orders.values().cloned().collect();
        newest_first(&mut orders, |o| o.created_at());
        Ok(orders)
    }

    async fn items(&self, order_id: Uuid) -> DomainResult<Vec<OrderItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<OrderItem> = tables
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    async fn update(&self, order: &Order) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&order.id()) {
            Some(stored) => {
                *stored = order.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("Order {}", order.id()))),
        }
    }
}
