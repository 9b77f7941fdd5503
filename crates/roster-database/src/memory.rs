//! In-memory user store for tests and single-process development runs.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use roster_core::error::AppError;
use roster_core::result::AppResult;
use roster_core::types::SortDirection;
use roster_entity::user::{
    NewUser, User, UserChanges, UserQuery, UserRole, UserSortField, normalize_email,
};

use crate::store::{UserStore, user_not_found};

/// Process-local [`UserStore`] guarded by a Tokio read-write lock.
///
/// Data is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

fn matches(user: &User, query: &UserQuery) -> bool {
    if !query.include_archived && user.is_deleted() {
        return false;
    }
    if let Some(email) = query.email.as_deref() {
        if user.email != normalize_email(email) {
            return false;
        }
    }
    if let Some(term) = query.search_term() {
        let needle = term.to_lowercase();
        let hit = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(&needle));
        if !(hit(Some(user.email.as_str()))
            || hit(user.first_name.as_deref())
            || hit(user.last_name.as_deref()))
        {
            return false;
        }
    }
    true
}

fn compare(a: &User, b: &User, field: UserSortField) -> Ordering {
    match field {
        UserSortField::Id => a.id.cmp(&b.id),
        UserSortField::Email => a.email.cmp(&b.email),
        UserSortField::FirstName => a.first_name.cmp(&b.first_name),
        UserSortField::LastName => a.last_name.cmp(&b.last_name),
        UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn is_sole_admin(users: &HashMap<Uuid, User>, id: Uuid) -> bool {
    users.get(&id).is_some_and(User::is_active_admin)
        && users.values().filter(|u| u.is_active_admin()).count() <= 1
}

fn apply_changes(
    users: &mut HashMap<Uuid, User>,
    id: Uuid,
    changes: &UserChanges,
) -> AppResult<User> {
    let email = changes.email.as_deref().map(normalize_email);
    if let Some(email) = email.as_deref() {
        if email_taken(users, email, Some(id)) {
            return Err(AppError::conflict("Email is already in use"));
        }
    }

    let user = users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(first_name) = &changes.first_name {
        user.first_name = Some(first_name.clone());
    }
    if let Some(last_name) = &changes.last_name {
        user.last_name = Some(last_name.clone());
    }
    if let Some(img_url) = &changes.img_url {
        user.img_url = Some(img_url.clone());
    }
    if let Some(role) = changes.role {
        user.role = role;
    }
    user.updated_at = Utc::now();
    Ok(user.clone())
}

fn write_deleted_at(
    users: &mut HashMap<Uuid, User>,
    id: Uuid,
    at: Option<DateTime<Utc>>,
) -> AppResult<User> {
    let user = users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
    user.deleted_at = at;
    user.updated_at = Utc::now();
    Ok(user.clone())
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, query: &UserQuery) -> AppResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        let mut selected: Vec<User> = users
            .values()
            .filter(|u| matches(u, query))
            .cloned()
            .collect();

        selected.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            let ordering = match query.sort_order {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let total = selected.len() as u64;
        let page = selected
            .into_iter()
            .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
            .take(query.page.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        let email = normalize_email(&data.email);
        if email_taken(&users, &email, None) {
            return Err(AppError::conflict("Email is already in use"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: data.password_hash.clone(),
            role: data.role,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            img_url: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> AppResult<User> {
        apply_changes(&mut *self.users.write().await, id, changes)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn touch_last_login(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
        user.last_login_at = Some(Utc::now());
        Ok(())
    }

    async fn set_deleted_at(&self, id: Uuid, at: Option<DateTime<Utc>>) -> AppResult<User> {
        write_deleted_at(&mut *self.users.write().await, id, at)
    }

    async fn archive_unless_last_admin(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        if is_sole_admin(&users, id) {
            return Ok(None);
        }
        write_deleted_at(&mut users, id, Some(at)).map(Some)
    }

    async fn update_unless_last_admin(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        if changes.role == Some(UserRole::User) && is_sole_admin(&users, id) {
            return Ok(None);
        }
        apply_changes(&mut users, id, changes).map(Some)
    }

    async fn count_active_admins(&self) -> AppResult<u64> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active_admin())
            .count() as u64)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut users = self.users.write().await;
        let removed = users.len() as u64;
        users.clear();
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
