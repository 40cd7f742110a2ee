// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod cart;
pub mod catalog;
pub mod errors;
pub mod order;
pub mod repositories;
pub mod user;

pub use errors::{DomainError, DomainResult};
