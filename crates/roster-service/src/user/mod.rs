//! User administration and self-service profile management.

pub mod profile;
pub mod service;

pub use profile::{ProfileService, UpdateProfileRequest};
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
