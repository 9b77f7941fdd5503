//! JWT claims carried by every Roster token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roster_entity::user::UserRole;

use super::audience::Audience;

/// JWT claims payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// User email at issuance.
    pub email: String,
    /// User role at issuance.
    pub role: UserRole,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Audience claim, e.g. `scope:access`.
    pub aud: String,
    /// Issuer.
    pub iss: String,
}

impl TokenClaims {
    /// The audience, if it is one Roster issues.
    pub fn audience(&self) -> Option<Audience> {
        Audience::from_claim(&self.aud)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
