//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use crate::dto::response::{ApiResponse, HealthResponse, ReadinessResponse, ServiceStates};
use crate::state::AppState;

/// GET /api/healthcheck
pub async fn healthcheck() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    }))
}

/// GET /api/health/live
pub async fn liveness() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "alive",
        timestamp: Utc::now(),
    }))
}

/// GET /api/health/ready
pub async fn readiness(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<ReadinessResponse>>) {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(ReadinessResponse {
                status: "ready",
                services: ServiceStates {
                    database: "connected",
                },
                timestamp: Utc::now(),
                error: None,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            let mut body = ApiResponse::ok(ReadinessResponse {
                status: "not ready",
                services: ServiceStates {
                    database: "disconnected",
                },
                timestamp: Utc::now(),
                error: Some(e.message),
            });
            body.success = false;
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
