//! Core type definitions shared across the Roster workspace.

pub mod duration;
pub mod pagination;
pub mod sorting;

pub use duration::parse_duration;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::SortDirection;
