use axum::extract::State;
use serde::Deserialize;

use crate::api::extract::ValidJson;
use crate::api::middleware::CurrentUser;
use crate::api::response::{ok, ApiResult};
use crate::api::state::AppState;
use crate::domain::user::User;
use crate::services::ProfilePatch;

/// Request body for profile updates; absent fields stay unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// GET /api/users/me
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResult<User> {
    ok("User fetched successfully", user)
}

/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> ApiResult<User> {
    let patch = ProfilePatch {
        name: req.name,
        phone: req.phone,
    };
    let user = state.accounts().update_profile(&user, patch).await?;

    ok("Profile updated successfully", user)
}
