//! # roster-database
//!
//! User persistence for Roster. [`UserStore`] is the seam the service layer
//! talks to; [`UserRepository`] implements it over PostgreSQL and
//! [`MemoryUserStore`] keeps everything in process for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryUserStore;
pub use repositories::UserRepository;
pub use store::UserStore;
