//! Seed handlers. Mounted behind the non-production guard.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use roster_entity::user::UserProfile;

use crate::dto::response::{ApiResponse, SeedResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/seed/reset
pub async fn reset(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SeedResponse>>, ApiError> {
    let users = state.seed_service.reset().await?;
    Ok(Json(ApiResponse::ok(SeedResponse {
        message: "Database reset successfully".to_string(),
        users: users.iter().map(|u| u.profile()).collect(),
    })))
}

/// POST /api/seed/user
pub async fn create_user(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), ApiError> {
    let user = state.seed_service.create_test_user().await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.profile()))))
}
