//! # roster-auth
//!
//! Credential primitives for Roster.
//!
//! ## Modules
//!
//! - `token`: audience-scoped JWTs, per-user derived secrets, issuing and verification
//! - `password`: Argon2id hashing, password policy, and initial password generation

pub mod password;
pub mod token;

pub use password::{PasswordHasher, PasswordValidator, generate_password};
pub use token::{Audience, IssuedToken, TokenClaims, TokenIssuer};
