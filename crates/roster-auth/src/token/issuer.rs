//! Token creation and verification.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use roster_core::config::AuthConfig;
use roster_core::error::AppError;
use roster_entity::user::User;

use super::audience::Audience;
use super::claims::TokenClaims;
use super::secret::derived_secret;

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Lifetime in milliseconds.
    pub expires_in_ms: u64,
}

/// Signs and verifies HS256 tokens for every [`Audience`].
#[derive(Clone)]
pub struct TokenIssuer {
    base_secret: String,
    issuer: String,
    access_ttl: Duration,
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates an issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            base_secret: config.jwt_secret.clone(),
            issuer: config.jwt_issuer.clone(),
            access_ttl: config.access_token_ttl()?,
            leeway_seconds: config.leeway_seconds,
        })
    }

    /// Configured access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    fn secret_for(&self, audience: Audience, user: &User) -> String {
        if audience.uses_derived_secret() {
            derived_secret(&self.base_secret, user)
        } else {
            self.base_secret.clone()
        }
    }

    /// Signs a token for `user` scoped to `audience`.
    pub fn issue(&self, user: &User, audience: Audience) -> Result<IssuedToken, AppError> {
        let ttl = audience.ttl(self.access_ttl);
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal(format!("Token lifetime out of range: {e}")))?;
        let expires_at = now + lifetime;

        let claims = TokenClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            aud: audience.as_str().to_string(),
            iss: self.issuer.clone(),
        };

        let secret = self.secret_for(audience, user);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Failed to encode {audience} token: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in_ms: ttl.as_millis() as u64,
        })
    }

    /// Verifies an access token against the base secret.
    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, AppError> {
        self.verify_with(token, Audience::Access, &self.base_secret)
    }

    /// Verifies a token of `audience` issued to `user`, recomputing the
    /// user's secret from their current state.
    pub fn verify_for_user(
        &self,
        token: &str,
        audience: Audience,
        user: &User,
    ) -> Result<TokenClaims, AppError> {
        let secret = self.secret_for(audience, user);
        let claims = self.verify_with(token, audience, &secret)?;
        if claims.sub != user.id {
            return Err(AppError::authentication("Token subject mismatch"));
        }
        Ok(claims)
    }

    fn verify_with(
        &self,
        token: &str,
        audience: Audience,
        secret: &str,
    ) -> Result<TokenClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_seconds;
        validation.set_audience(&[audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            debug!(audience = %audience, error = %e, "Token rejected");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                    AppError::authentication("Token audience mismatch")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication("Invalid token"),
            }
        })?;

        // jsonwebtoken already checked both; keep the contract explicit.
        if data.claims.audience() != Some(audience) {
            return Err(AppError::authentication("Token audience mismatch"));
        }
        if data.claims.exp + self.leeway_seconds as i64 <= Utc::now().timestamp() {
            return Err(AppError::authentication("Token has expired"));
        }

        Ok(data.claims)
    }

    /// Reads the claims of a token without verifying its signature.
    ///
    /// Only for locating the user whose secret is needed to verify the token.
    pub fn peek(token: &str) -> Result<TokenClaims, AppError> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(AppError::authentication("Invalid token format")),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AppError::authentication("Invalid token format"))?;
        serde_json::from_slice(&bytes).map_err(|_| AppError::authentication("Invalid token format"))
    }
}
