use thiserror::Error;

/// Errors raised by domain rules, services and repositories
///
/// Every variant maps onto exactly one HTTP status in the API layer, so
/// handlers can propagate these with `?` and let the conversion in
/// `api::errors` pick the response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input or a broken business rule (400)
    #[error("{0}")]
    Validation(String),

    /// Caller could not be authenticated (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but lacks the required role (403)
    #[error("{0}")]
    Forbidden(String),

    /// Entity does not exist or is soft-deleted (404)
    #[error("{0} not found")]
    NotFound(String),

    /// The user has no cart yet (404)
    #[error("No cart found for the user")]
    NoCart,

    /// The user's cart has no items to check out (404)
    #[error("No items found in the cart")]
    EmptyCart,

    /// Duplicate entity, e.g. the same product twice in a cart (409)
    #[error("{0}")]
    Conflict(String),

    /// Any storage failure (500)
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
