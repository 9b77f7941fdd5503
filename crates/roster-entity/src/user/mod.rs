//! User domain entities.

pub mod model;
pub mod query;
pub mod role;

pub use model::{NewUser, User, UserChanges, UserProfile, normalize_email};
pub use query::{UserQuery, UserSortField};
pub use role::UserRole;
