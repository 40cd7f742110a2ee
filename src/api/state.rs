//! Application state shared across handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::domain::repositories::{
    CartItemRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresCartItemRepository, PostgresCartRepository, PostgresCategoryRepository,
    PostgresOrderRepository, PostgresProductRepository, PostgresUserRepository,
};
use crate::notifications::{EmailSender, SmsSender};
use crate::services::{
    AccountService, CartService, CatalogService, CheckoutService, Notifier, OrderService,
};

/// One handle per repository port
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub cart_items: Arc<dyn CartItemRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    /// PostgreSQL adapters sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            products: Arc::new(PostgresProductRepository::new(pool.clone())),
            carts: Arc::new(PostgresCartRepository::new(pool.clone())),
            cart_items: Arc::new(PostgresCartItemRepository::new(pool.clone())),
            orders: Arc::new(PostgresOrderRepository::new(pool)),
        }
    }

    /// Every port served by the same in-memory store
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            categories: store.clone(),
            products: store.clone(),
            carts: store.clone(),
            cart_items: store.clone(),
            orders: store,
        }
    }
}

/// Outbound notification channels
#[derive(Clone)]
pub struct Channels {
    pub email: Arc<dyn EmailSender>,
    pub sms: Arc<dyn SmsSender>,
    pub admin_address: Option<String>,
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    identity: Arc<dyn IdentityProvider>,
    accounts: AccountService,
    cart: CartService,
    catalog: CatalogService,
    checkout: CheckoutService,
    orders: OrderService,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        identity: Arc<dyn IdentityProvider>,
        channels: Channels,
    ) -> Self {
        let notifier = Notifier::new(
            channels.email,
            channels.sms,
            channels.admin_address,
            repos.products.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                identity,
                accounts: AccountService::new(repos.users.clone()),
                cart: CartService::new(
                    repos.carts.clone(),
                    repos.cart_items.clone(),
                    repos.products.clone(),
                ),
                catalog: CatalogService::new(repos.categories.clone(), repos.products.clone()),
                checkout: CheckoutService::new(repos.carts.clone(), repos.orders.clone(), notifier),
                orders: OrderService::new(repos.orders),
            }),
        }
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
