// Catalog domain module
// Product categories (parent-pointer tree) and products

pub mod category;
pub mod pagination;
pub mod product;

pub use category::{Category, CategoryPatch};
pub use pagination::Pagination;
pub use product::{NewProduct, Product, ProductPatch};
