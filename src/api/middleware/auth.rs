use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::Claims;
use crate::domain::user::User;

/// Verified identity claims for protected routes
///
/// Rejects with 401 before any handler logic when the header is missing,
/// does not use the `Bearer` scheme, carries an empty token, or the token
/// fails verification.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(AuthClaims(claims): AuthClaims) -> String {
///     format!("Hello {}", claims.sub)
/// }
/// ```
pub struct AuthClaims(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state.identity().verify(token).await.map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            ApiError::from(e)
        })?;

        Ok(AuthClaims(claims))
    }
}

/// The local account behind a verified bearer token
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;
        let user = state.accounts().resolve(&claims.sub).await?;
        Ok(CurrentUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

    if token.is_empty() {
        return Err(ApiError::unauthorized("Empty bearer token"));
    }
    Ok(token)
}
