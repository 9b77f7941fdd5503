//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use roster_core::types::PageResponse;
use roster_entity::user::{UserProfile, UserQuery};

use crate::dto::request::{CreateUserRequest, ListUsersQuery, UpdateUserRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, ValidatedQuery, parse_uuid};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<ApiResponse<PageResponse<UserProfile>>>, ApiError> {
    require_admin(&auth)?;
    let query = UserQuery::from(params);
    let page = state.user_service.find_all(&query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), ApiError> {
    require_admin(&auth)?;
    let user = state.user_service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.profile()))))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    require_admin(&auth)?;
    let user = state.user_service.get(parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(user.profile())))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    require_admin(&auth)?;
    let user = state
        .user_service
        .update(auth.context(), parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user.profile())))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    state
        .user_service
        .remove(auth.context(), parse_uuid(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/{id}/restore
pub async fn restore_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    require_admin(&auth)?;
    let user = state.user_service.restore(parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(user.profile())))
}

/// POST /api/users/{id}/reinvite
pub async fn reinvite_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    state.user_service.reinvite(parse_uuid(&id)?).await?;
    Ok(StatusCode::ACCEPTED)
}
