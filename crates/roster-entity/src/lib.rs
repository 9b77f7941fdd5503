//! # roster-entity
//!
//! Domain entity models for Roster. `User` maps one row of the `users`
//! table; the remaining types are value objects and change sets passed
//! between the service and storage layers.

pub mod user;

pub use user::{NewUser, User, UserChanges, UserProfile, UserQuery, UserRole, UserSortField};
