//! Route guard for endpoints that must not exist in production.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use roster_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Answers 403 in production without reaching the handler.
pub async fn non_production_only(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.config.environment.is_production() {
        tracing::warn!(path = %request.uri().path(), "Seed endpoint called in production");
        return Err(AppError::authorization("Seed endpoints are not available in prod").into());
    }
    Ok(next.run(request).await)
}
