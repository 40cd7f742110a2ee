use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::api::errors::ApiError;

/// Success envelope: `{success: true, message, data?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Wraps `data` in a success envelope with the given status
pub fn respond<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }),
    )
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(respond(StatusCode::OK, message, data))
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(respond(StatusCode::CREATED, message, data))
}

/// Success without a payload
pub fn done(message: impl Into<String>) -> ApiResult<()> {
    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: None,
        }),
    ))
}
