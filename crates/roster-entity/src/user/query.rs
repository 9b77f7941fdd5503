//! Listing filters for users.

use roster_core::types::{PageRequest, SortDirection};
use serde::{Deserialize, Serialize};

/// Columns a user listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSortField {
    Id,
    Email,
    FirstName,
    LastName,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl UserSortField {
    /// Column name in the `users` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Filter, sort and page selection for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Exact (normalized) email match.
    pub email: Option<String>,
    /// Case-insensitive substring over email, first and last name.
    pub search: Option<String>,
    /// Include archived users.
    pub include_archived: bool,
    pub page: PageRequest,
    pub sort_by: UserSortField,
    pub sort_order: SortDirection,
}

impl UserQuery {
    /// The trimmed search term, if it is not blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
