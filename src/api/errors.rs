use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::auth::AuthError;
use crate::domain::errors::DomainError;

/// API error type with HTTP status code, message and optional detail
///
/// Renders the failure envelope `{success: false, message, error?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Attaches a machine-oriented detail string
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                message = %self.message,
                detail = ?self.detail,
                "Request failed"
            );
        }

        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("message".to_string(), Value::String(self.message));
        // Server-side detail stays in the log
        match self.detail {
            Some(detail) if !self.status.is_server_error() => {
                body.insert("error".to_string(), Value::String(detail));
            }
            _ => {}
        }

        (self.status, Json(Value::Object(body))).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(message) => Self::bad_request(message),
            DomainError::Unauthorized(message) => Self::unauthorized(message),
            DomainError::Forbidden(message) => Self::forbidden(message),
            DomainError::NotFound(_) | DomainError::NoCart | DomainError::EmptyCart => {
                Self::not_found(error.to_string())
            }
            DomainError::Conflict(message) => Self::conflict(message),
            DomainError::Persistence(detail) => {
                Self::internal_server_error("Internal server error").with_detail(detail)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        if error.is_credential_error() {
            Self::unauthorized("Invalid token").with_detail(error.to_string())
        } else {
            Self::internal_server_error("Identity provider unavailable")
                .with_detail(error.to_string())
        }
    }
}
