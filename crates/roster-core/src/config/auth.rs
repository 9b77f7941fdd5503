//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::duration::parse_duration;

/// Development-only signing secret; rejected in production.
pub const DEFAULT_JWT_SECRET: &str = "auth-jwt-secret";

/// Shortest lifetime an access token may be configured with.
pub const MIN_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Longest lifetime an access token may be configured with.
pub const MAX_ACCESS_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base secret for HS256 signing. Invitation and reset tokens derive
    /// their per-user secret from it.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// `iss` claim written into and required from every token.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Access token lifetime as a duration string (`15m`, `12h`, `7d`).
    #[serde(default = "default_jwt_expires_in")]
    pub jwt_expires_in: String,
    /// Name of the cookie carrying the access token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Clock skew tolerated when checking `exp`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn score (0-4). Zero disables the entropy check.
    #[serde(default)]
    pub password_min_strength: u8,
}

impl AuthConfig {
    /// Parsed access token lifetime, bounded to 15 minutes..=7 days.
    pub fn access_token_ttl(&self) -> Result<Duration, AppError> {
        let ttl = parse_duration(&self.jwt_expires_in)?;
        if !(MIN_ACCESS_TTL..=MAX_ACCESS_TTL).contains(&ttl) {
            return Err(AppError::configuration(format!(
                "auth.jwt_expires_in must be between 15m and 7d, got '{}'",
                self.jwt_expires_in
            )));
        }
        Ok(ttl)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            jwt_expires_in: default_jwt_expires_in(),
            cookie_name: default_cookie_name(),
            leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
            password_min_strength: 0,
        }
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_jwt_issuer() -> String {
    "App".to_string()
}

fn default_jwt_expires_in() -> String {
    "7d".to_string()
}

fn default_cookie_name() -> String {
    "access_token".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    8
}
