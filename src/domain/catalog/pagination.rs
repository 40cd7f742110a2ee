use crate::domain::errors::{DomainError, DomainResult};

pub const DEFAULT_LIMIT: i64 = 10;

/// Validated limit/offset window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Pagination {
    /// Builds a window, rejecting `limit <= 0` and `offset < 0`
    ///
    /// # Example
    /// ```
    /// use storefront_api::domain::catalog::Pagination;
    ///
    /// let page = Pagination::new(Some(5), None).expect("valid window");
    /// assert_eq!((page.limit(), page.offset()), (5, 0));
    /// assert!(Pagination::new(Some(0), None).is_err());
    /// ```
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> DomainResult<Self> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);

        if limit <= 0 {
            return Err(DomainError::validation("Invalid limit: must be greater than zero"));
        }
        if offset < 0 {
            return Err(DomainError::validation("Invalid offset: cannot be negative"));
        }

        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
