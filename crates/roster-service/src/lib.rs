//! # roster-service
//!
//! Business logic service layer for Roster. Each service orchestrates the
//! user store, token issuer, password primitives and mail delivery to
//! implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod context;
pub mod mail;
pub mod seed;
pub mod user;

#[cfg(test)]
mod testing;

pub use auth::{AuthService, LoginResult};
pub use context::RequestContext;
pub use mail::{MailMessage, MailService, MailTransport, MemoryTransport};
pub use seed::SeedService;
pub use user::{
    CreateUserRequest, ProfileService, UpdateProfileRequest, UpdateUserRequest, UserService,
};
