//! Axum middleware stack.

pub mod compression;
pub mod cors;
pub mod environment;
pub mod logging;
pub mod rate_limit;
pub mod rbac;

pub use rate_limit::RateLimiter;
