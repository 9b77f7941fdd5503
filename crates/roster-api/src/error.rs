//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use roster_core::error::{AppError, ErrorKind};

/// Error returned by handlers, extractors and middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A domain error raised below the HTTP layer.
    #[error(transparent)]
    App(#[from] AppError),
    /// A protocol-level failure with a fixed status (unknown route, oversized body).
    #[error("{status}: {message}")]
    Http {
        status: StatusCode,
        message: String,
    },
    /// Too many requests; `retry_after` is in whole seconds.
    #[error("rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },
}

impl ApiError {
    /// Protocol-level error with an explicit status.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::App(AppError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::App(AppError::validation(rejection.body_text()))
    }
}

/// Error section of the envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Error family: `Validation`, `Authentication`, `Authorization`,
    /// `RateLimit`, `Internal` or `Http`.
    #[serde(rename = "type")]
    pub error_type: &'static str,
    /// Machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Structured details such as per-field validation failures.
    pub details: Option<serde_json::Value>,
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
    pub timestamp: DateTime<Utc>,
}

/// HTTP status, error family and code for a domain error kind.
fn classify(kind: ErrorKind) -> (StatusCode, &'static str, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "Validation", "VALIDATION_ERROR"),
        ErrorKind::LastAdmin => (StatusCode::BAD_REQUEST, "Validation", "LAST_ADMIN"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "Authentication", "UNAUTHORIZED"),
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, "Authorization", "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Http", "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "Http", "CONFLICT"),
        ErrorKind::ExternalService => (StatusCode::BAD_GATEWAY, "Internal", "EXTERNAL_SERVICE"),
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal", "INTERNAL_ERROR")
        }
    }
}

fn http_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        _ => "HTTP_ERROR",
    }
}

fn envelope(status: StatusCode, error: ErrorBody) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error,
        timestamp: Utc::now(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::App(err) => {
                let (status, error_type, code) = classify(err.kind);
                let message = if status.is_server_error() && error_type == "Internal" {
                    tracing::error!(
                        kind = %err.kind,
                        error = %err.message,
                        source = ?err.source,
                        "Internal server error"
                    );
                    "Internal server error".to_string()
                } else {
                    tracing::debug!(kind = %err.kind, error = %err.message, "Request failed");
                    err.message
                };
                envelope(
                    status,
                    ErrorBody {
                        error_type,
                        code,
                        message,
                        details: err.details,
                    },
                )
            }
            Self::Http { status, message } => envelope(
                status,
                ErrorBody {
                    error_type: "Http",
                    code: http_code(status),
                    message,
                    details: None,
                },
            ),
            Self::RateLimited { retry_after } => {
                let mut response = envelope(
                    StatusCode::TOO_MANY_REQUESTS,
                    ErrorBody {
                        error_type: "RateLimit",
                        code: "RATE_LIMITED",
                        message: "Too many requests, please try again later".to_string(),
                        details: Some(serde_json::json!({ "retryAfter": retry_after })),
                    },
                );
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
                response
            }
        }
    }
}
