//! Current-user handlers.

use axum::Json;
use axum::extract::State;

use roster_entity::user::UserProfile;

use crate::dto::request::UpdateProfileRequest;
use crate::dto::response::{ApiResponse, CurrentUserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CurrentUserResponse>>, ApiError> {
    let user = state.profile_service.me(auth.context()).await?;
    Ok(Json(ApiResponse::ok(CurrentUserResponse { user })))
}

/// PATCH /api/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .profile_service
        .update(auth.context(), req.into())
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}
