use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::api::errors::ApiError;
use crate::api::extract::ApiQuery;
use crate::api::response::{ok, ApiResult};
use crate::api::state::AppState;
use crate::auth::generate_state;
use crate::domain::user::User;

/// Session key holding the anti-forgery state of a pending login
pub const LOGIN_STATE_KEY: &str = "login_state";

/// Query string the identity provider sends back
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Response from a successful callback
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    /// Raw identity token, used as the bearer credential
    pub token: String,
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// Redirect to the identity provider's login page
///
/// GET /api/auth/login
pub async fn login(State(state): State<AppState>, session: Session) -> Result<Response, ApiError> {
    let login_state = generate_state();
    session
        .insert(LOGIN_STATE_KEY, &login_state)
        .await
        .map_err(session_error)?;

    let url = state.identity().authorization_url(&login_state).await?;
    Ok((StatusCode::FOUND, [(LOCATION, url)]).into_response())
}

/// Complete the authorization-code flow
///
/// GET /api/auth/callback?code=&state=
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    ApiQuery(query): ApiQuery<CallbackQuery>,
) -> ApiResult<AuthResponse> {
    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing authorization code"))?;

    let returned = query
        .state
        .ok_or_else(|| ApiError::bad_request("Missing login state"))?;

    // One-time use: taken out of the session whether or not it matches
    let expected: Option<String> = session
        .remove(LOGIN_STATE_KEY)
        .await
        .map_err(session_error)?;
    if expected.as_deref() != Some(returned.as_str()) {
        tracing::warn!("Login state mismatch");
        return Err(ApiError::bad_request("Invalid login state"));
    }

    let tokens = state.identity().exchange_code(&code).await.map_err(|e| {
        tracing::warn!(error = %e, "Authorization code exchange failed");
        ApiError::unauthorized("Failed to exchange authorization code").with_detail(e.to_string())
    })?;

    let claims = state.identity().verify(&tokens.id_token).await.map_err(|e| {
        tracing::warn!(error = %e, "Identity token verification failed");
        ApiError::unauthorized("Failed to verify identity token").with_detail(e.to_string())
    })?;

    let user = state.accounts().sign_in(&claims).await?;
    tracing::info!(user_id = %user.id, "User signed in");

    ok(
        "Login successful",
        AuthResponse {
            user,
            token: tokens.id_token,
        },
    )
}

fn session_error(error: tower_sessions::session::Error) -> ApiError {
    ApiError::internal_server_error("Session unavailable").with_detail(error.to_string())
}
