//! Route handlers organized by domain.

pub mod auth;
pub mod health;
pub mod me;
pub mod seed;
pub mod users;
