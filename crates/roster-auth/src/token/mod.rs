//! Audience-scoped JWTs.
//!
//! Access tokens are signed with the configured base secret. Invitation and
//! reset tokens are signed with a secret derived from the user's current
//! password hash, so changing the password revokes every such token that
//! was issued before the change.

pub mod audience;
pub mod claims;
pub mod issuer;
pub mod secret;

pub use audience::Audience;
pub use claims::TokenClaims;
pub use issuer::{IssuedToken, TokenIssuer};
pub use secret::derived_secret;
