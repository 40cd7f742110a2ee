// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod state;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};

use handlers::{auth, cart, categories, orders, products, users};
pub use state::{AppState, Channels, Repositories};

/// Every route of the service, with state applied
///
/// `sessions` wraps only the login routes. Cross-cutting layers (CORS,
/// tracing) are added by the binary.
pub fn router(state: AppState, sessions: SessionManagerLayer<MemoryStore>) -> Router {
    let login = Router::new()
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .layer(sessions);

    let api = Router::new()
        .merge(login)
        // User routes
        .route("/users/me", get(users::me).patch(users::update_me))
        // Cart routes
        .route("/cart", get(cart::view_cart))
        .route("/cart/create", post(cart::add_item))
        .route("/cart/remove/:id", delete(cart::remove_item))
        .route("/cart/update/quantity/:id", patch(cart::update_quantity))
        // Order routes
        .route("/orders", get(orders::list_orders))
        .route("/orders/create", post(orders::create_order))
        .route("/orders/mine", get(orders::my_orders))
        .route("/orders/:id", get(orders::get_order))
        .route("/orders/:id/status", patch(orders::update_status))
        .route("/orders/:id/paid", patch(orders::update_paid))
        // Category routes
        .route("/products/categories", get(categories::list_categories))
        .route("/products/categories/create", post(categories::create_category))
        .route(
            "/products/categories/:id",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        // Product routes
        .route("/products", get(products::list_products))
        .route("/products/create", post(products::create_product))
        .route(
            "/products/:id",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        );

    Router::new()
        .route("/health", get(auth::health_check))
        .nest("/api", api)
        .with_state(state)
}
