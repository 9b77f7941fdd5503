//! Request/response logging middleware.

use std::time::Instant;

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Substrings that mark a JSON key as sensitive.
const SENSITIVE_KEYS: [&str; 6] = ["password", "token", "secret", "key", "auth", "credential"];

const MASK: &str = "***";

fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|s| key.contains(s))
}

/// Replaces the values of sensitive keys at any depth.
pub fn mask_sensitive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if is_sensitive(key) {
                    *v = Value::String(MASK.to_string());
                } else {
                    mask_sensitive(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_sensitive),
        _ => {}
    }
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Logs request method, path, status, duration and the masked JSON body.
pub async fn request_logging(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let (request, body) = if is_json(&request) {
        let (parts, body) = request.into_parts();
        let bytes = match to_bytes(body, state.config.server.body_limit_bytes).await {
            Ok(bytes) => bytes,
            Err(_) => {
                warn!(method = %method, path = %path, "Request body too large");
                return ApiError::http(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
                    .into_response();
            }
        };
        let masked = serde_json::from_slice::<Value>(&bytes).ok().map(|mut v| {
            mask_sensitive(&mut v);
            v
        });
        (Request::from_parts(parts, Body::from(bytes)), masked)
    } else {
        (request, None)
    };

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    match body {
        Some(body) => info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            body = %body,
            "HTTP request"
        ),
        None => info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request"
        ),
    }

    response
}
