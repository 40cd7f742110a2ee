// HTTP handlers, one module per resource

pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use serde::Deserialize;

use crate::domain::catalog::Pagination;
use crate::domain::errors::DomainResult;

/// `?limit=&offset=` on list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    pub fn pagination(&self) -> DomainResult<Pagination> {
        Pagination::new(self.limit, self.offset)
    }
}
