//! Token bucket rate limiter middleware.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;

use roster_core::config::RateLimitConfig;

use crate::error::ApiError;
use crate::state::AppState;

/// Buckets kept before idle, fully refilled ones are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

/// Simple in-memory token bucket rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Client key → bucket state.
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            max_tokens,
            refill_rate,
        }
    }

    /// `max_requests` per `window_seconds`, refilled continuously.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let window = config.window_seconds.max(1) as f64;
        Self::new(config.max_requests, config.max_requests as f64 / window)
    }

    /// Attempts to consume a token for the given key. On refusal returns how
    /// long until the next token is available.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        let max = self.max_tokens as f64;

        if buckets.len() >= PRUNE_THRESHOLD {
            let rate = self.refill_rate;
            buckets.retain(|_, b| {
                b.tokens + now.duration_since(b.last_refill).as_secs_f64() * rate < max
            });
        }

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: max,
            last_refill: now,
        });

        // Refill tokens
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(max);
        bucket.last_refill = now;

        // Try to consume
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else if self.refill_rate > 0.0 {
            Err(Duration::from_secs_f64((1.0 - bucket.tokens) / self.refill_rate))
        } else {
            Err(Duration::MAX)
        }
    }
}

/// First hop of `X-Forwarded-For`, or `unknown`.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rejects clients that exhausted their bucket with 429 and `Retry-After`.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.config.server.rate_limit.enabled {
        return Ok(next.run(request).await);
    }

    let key = client_key(request.headers());
    if let Err(wait) = state.rate_limiter.check(&key).await {
        let retry_after = wait.as_secs_f64().ceil().clamp(1.0, 86_400.0) as u64;
        tracing::warn!(client = %key, retry_after, "Rate limit exceeded");
        return Err(ApiError::RateLimited { retry_after });
    }

    Ok(next.run(request).await)
}
