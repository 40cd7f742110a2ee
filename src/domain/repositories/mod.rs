// Repository traits (ports)
// Implemented by adapters in infrastructure::repositories

pub mod cart_repository;
pub mod category_repository;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

pub use cart_repository::{CartItemRepository, CartRepository};
pub use category_repository::CategoryRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;
