//! Token audiences.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifetime of invitation tokens.
pub const INVITATION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Lifetime of password reset tokens.
pub const RESET_TTL: Duration = Duration::from_secs(60 * 60);

/// What a token may be used for, carried in the `aud` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    /// Authorizes API requests.
    #[serde(rename = "scope:access")]
    Access,
    /// Lets an invited user set their first password.
    #[serde(rename = "scope:invitation")]
    Invitation,
    /// Lets a user replace a forgotten password.
    #[serde(rename = "scope:reset")]
    Reset,
}

impl Audience {
    /// All audiences.
    pub const ALL: [Audience; 3] = [Self::Access, Self::Invitation, Self::Reset];

    /// The `aud` claim value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "scope:access",
            Self::Invitation => "scope:invitation",
            Self::Reset => "scope:reset",
        }
    }

    /// Parse an `aud` claim value.
    pub fn from_claim(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }

    /// Whether tokens of this audience are signed with the per-user secret.
    pub fn uses_derived_secret(&self) -> bool {
        !matches!(self, Self::Access)
    }

    /// Token lifetime; access tokens use the configured lifetime.
    pub fn ttl(&self, access_ttl: Duration) -> Duration {
        match self {
            Self::Access => access_ttl,
            Self::Invitation => INVITATION_TTL,
            Self::Reset => RESET_TTL,
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
