// Order domain module
// Order aggregate root, line items and status value object

#![allow(clippy::module_inception)]

pub mod order;
pub mod value_objects;

pub use order::{order_total, Order, OrderItem, PlacedOrder};
pub use value_objects::OrderStatus;
