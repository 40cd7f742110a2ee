//! Application services.
//!
//! Each service owns the rules of one workflow and talks to storage only
//! through the repository traits, so handlers stay thin and every workflow
//! can be exercised against the in-memory store.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

pub use accounts::{AccountService, ProfilePatch};
pub use cart::{CartService, CartView};
pub use catalog::CatalogService;
pub use checkout::{CheckoutService, Notifier};
pub use orders::OrderService;
