//! The storage seam for user accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use roster_core::result::AppResult;
use roster_entity::user::{NewUser, User, UserChanges, UserQuery};

/// Persistence operations on user accounts.
///
/// Lookups by id or email return archived rows too; callers decide whether
/// an archived user is acceptable. Emails are normalized by the store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by primary key, archived or not.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (normalized before matching), archived or not.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// One page of users matching `query` plus the total match count.
    async fn list(&self, query: &UserQuery) -> AppResult<(Vec<User>, u64)>;

    /// Insert a new user. A taken email yields `Conflict`.
    async fn create(&self, data: &NewUser) -> AppResult<User>;

    /// Apply a partial update. A taken email yields `Conflict`.
    async fn update(&self, id: Uuid, changes: &UserChanges) -> AppResult<User>;

    /// Replace the password hash.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User>;

    /// Stamp `last_login_at` with the current time.
    async fn touch_last_login(&self, id: Uuid) -> AppResult<()>;

    /// Archive (`Some`) or restore (`None`) a user.
    async fn set_deleted_at(&self, id: Uuid, at: Option<DateTime<Utc>>) -> AppResult<User>;

    /// Archive `id` in the same step as checking that another active admin
    /// remains. `Ok(None)` means `id` is the last active admin and nothing
    /// changed.
    async fn archive_unless_last_admin(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// Apply `changes` unless they demote the last active admin, checked and
    /// written in one step. `Ok(None)` means the demotion was refused.
    async fn update_unless_last_admin(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> AppResult<Option<User>>;

    /// Number of ADMIN users that are not archived.
    async fn count_active_admins(&self) -> AppResult<u64>;

    /// Hard-delete every user. Returns the number removed.
    async fn delete_all(&self) -> AppResult<u64>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> AppResult<()>;
}

pub(crate) fn user_not_found(id: Uuid) -> roster_core::AppError {
    roster_core::AppError::not_found(format!("User with id {id} not found"))
}
