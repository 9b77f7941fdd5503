//! Request DTOs with validation.

use serde::{Deserialize, Deserializer};
use validator::Validate;

use roster_core::types::pagination::DEFAULT_PAGE_LIMIT;
use roster_core::types::{PageRequest, SortDirection};
use roster_entity::user::{UserQuery, UserRole, UserSortField};
use roster_service::{
    CreateUserRequest as SvcCreateUser, UpdateProfileRequest as SvcUpdateProfile,
    UpdateUserRequest as SvcUpdateUser,
};

use super::validation::{image_url, no_xss, not_blank, password_policy};

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

fn trimmed_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be longer than or equal to 8 characters"))]
    pub password: String,
}

/// Forgot-password request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "email must be an email"))]
    pub email: String,
}

/// Reset-password request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "not_blank"))]
    pub token: String,
    #[validate(
        length(min = 8, message = "newPassword must be longer than or equal to 8 characters"),
        custom(function = "password_policy")
    )]
    pub new_password: String,
}

/// Token-status request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenStatusRequest {
    #[validate(custom(function = "not_blank"))]
    pub token: String,
}

/// Password change request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(custom(function = "not_blank"))]
    pub current_password: String,
    #[validate(
        length(min = 8, message = "newPassword must be longer than or equal to 8 characters"),
        custom(function = "password_policy")
    )]
    pub new_password: String,
}

/// Update own profile request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 2, max = 50), custom(function = "no_xss"))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 2, max = 50), custom(function = "no_xss"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "image_url"))]
    pub img_url: Option<String>,
}

impl From<UpdateProfileRequest> for SvcUpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            img_url: req.img_url,
        }
    }
}

/// Create user request (admin).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 50), custom(function = "no_xss"))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 50), custom(function = "no_xss"))]
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
}

impl From<CreateUserRequest> for SvcCreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: req.email,
            first_name: req.first_name.filter(|s| !s.is_empty()),
            last_name: req.last_name.filter(|s| !s.is_empty()),
            role: req.role,
        }
    }
}

/// Update user request (admin).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 2, max = 50), custom(function = "no_xss"))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 2, max = 50), custom(function = "no_xss"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "image_url"))]
    pub img_url: Option<String>,
    pub role: Option<UserRole>,
}

impl From<UpdateUserRequest> for SvcUpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            img_url: req.img_url,
            role: req.role,
        }
    }
}

/// Query string of the user listing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,
    pub search: Option<String>,
    pub include_archived: Option<bool>,
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u64>,
    pub sort_by: Option<UserSortField>,
    pub sort_order: Option<SortDirection>,
}

impl From<ListUsersQuery> for UserQuery {
    fn from(q: ListUsersQuery) -> Self {
        Self {
            email: q.email.map(|e| e.trim().to_string()),
            search: q.search,
            include_archived: q.include_archived.unwrap_or(false),
            page: PageRequest::new(q.page.unwrap_or(1), q.limit.unwrap_or(DEFAULT_PAGE_LIMIT)),
            sort_by: q.sort_by.unwrap_or_default(),
            sort_order: q.sort_order.unwrap_or_default(),
        }
    }
}
