//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use roster_entity::user::UserProfile;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
    /// Server time the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ user }` wrapper returned by the current-user endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub user: UserProfile,
}

/// Liveness style health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` or `alive`.
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Dependency states reported by the readiness check.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStates {
    pub database: &'static str,
}

/// Readiness check response.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// `ready` or `not ready`.
    pub status: &'static str,
    pub services: ServiceStates,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of resetting the seed data.
#[derive(Debug, Clone, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub users: Vec<UserProfile>,
}
