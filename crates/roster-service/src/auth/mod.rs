//! Login, password management and token-based authentication.

pub mod service;

pub use service::{AuthService, LoginResult};
