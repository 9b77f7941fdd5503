//! # roster-core
//!
//! Core crate for Roster. Contains configuration schemas, pagination,
//! sorting and duration types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Roster crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
