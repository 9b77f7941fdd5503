//! Fixture data for development and automated test environments.

pub mod service;

pub use service::{SEED_USERS, SeedService, SeedUser};
