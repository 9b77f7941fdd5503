//! Admin user management: CRUD, archive and restore, invitations.
//!
//! Every path that could remove the last active admin (archiving or
//! demoting one) is guarded here and fails with `ErrorKind::LastAdmin`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use roster_auth::password::{PasswordHasher, generate_password};
use roster_core::error::AppError;
use roster_core::result::AppResult;
use roster_core::types::PageResponse;
use roster_database::UserStore;
use roster_entity::user::{
    NewUser, User, UserChanges, UserProfile, UserQuery, UserRole, normalize_email,
};

use crate::auth::AuthService;
use crate::context::RequestContext;

/// Request to create (invite) a new user.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Defaults to [`UserRole::User`].
    pub role: Option<UserRole>,
}

/// Request to update a user (admin).
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub img_url: Option<String>,
    pub role: Option<UserRole>,
}

/// Handles administrative user management operations.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    auth: Arc<AuthService>,
    hasher: Arc<PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        store: Arc<dyn UserStore>,
        auth: Arc<AuthService>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            store,
            auth,
            hasher,
        }
    }

    /// Gets a user by ID, archived or not.
    pub async fn get(&self, id: Uuid) -> AppResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id {id} not found")))
    }

    /// Creates a user with a random password and mails them an invitation.
    pub async fn create(&self, req: CreateUserRequest) -> AppResult<User> {
        if let Some(existing) = self.store.find_by_email(&req.email).await? {
            debug!(
                email = %existing.email,
                archived = existing.is_deleted(),
                "Email already taken"
            );
            return Err(AppError::conflict(if existing.is_deleted() {
                "Email was previously used and is currently inactivated. Please restore the user instead."
            } else {
                "User with this email already exists"
            }));
        }

        let password_hash = self.hasher.hash_password(&generate_password())?;
        let user = self
            .store
            .create(&NewUser {
                email: req.email,
                password_hash,
                role: req.role.unwrap_or_default(),
                first_name: req.first_name,
                last_name: req.last_name,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User created");

        if let Err(e) = self.auth.send_invitation(&user).await {
            warn!(user_id = %user.id, error = %e, "Failed to send invitation email");
        }

        Ok(user)
    }

    /// Lists users page by page.
    pub async fn find_all(&self, query: &UserQuery) -> AppResult<PageResponse<UserProfile>> {
        let (users, total) = self.store.list(query).await?;
        debug!(count = users.len(), total, "Fetched users");
        Ok(PageResponse::new(users, query.page, total).map(|u| u.profile()))
    }

    /// Fails early when `user` is the only active admin. The store repeats
    /// the check atomically with the write.
    async fn ensure_not_last_admin(&self, user: &User, message: &str) -> AppResult<()> {
        if user.is_active_admin() && self.store.count_active_admins().await? <= 1 {
            return Err(AppError::last_admin(message));
        }
        Ok(())
    }

    /// Updates a user's fields, including role.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateUserRequest,
    ) -> AppResult<User> {
        let user = self.get(id).await?;
        let demotion = user.is_admin() && req.role == Some(UserRole::User);

        if demotion {
            self.ensure_not_last_admin(&user, "Cannot demote the last admin")
                .await?;
            if ctx.user_id == id {
                return Err(AppError::validation("Cannot demote your own admin account"));
            }
        }

        if let Some(email) = req.email.as_deref() {
            let email = normalize_email(email);
            if email != user.email && self.store.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict("Email is already in use"));
            }
        }

        let changes = UserChanges {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            img_url: req.img_url,
            role: req.role,
        };
        let updated = self
            .store
            .update_unless_last_admin(id, &changes)
            .await?
            .ok_or_else(|| AppError::last_admin("Cannot demote the last admin"))?;

        info!(
            admin_id = %ctx.user_id,
            target_id = %id,
            role = %updated.role,
            "User updated by admin"
        );
        Ok(updated)
    }

    /// Archives a user.
    pub async fn remove(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let user = self.get(id).await?;

        self.ensure_not_last_admin(&user, "Cannot delete the last admin")
            .await?;
        if ctx.user_id == id {
            return Err(AppError::validation("Cannot delete your own admin account"));
        }

        self.store
            .archive_unless_last_admin(id, Utc::now())
            .await?
            .ok_or_else(|| AppError::last_admin("Cannot delete the last admin"))?;
        info!(admin_id = %ctx.user_id, target_id = %id, "User archived");
        Ok(())
    }

    /// Brings an archived user back, unchanged apart from the archive mark.
    pub async fn restore(&self, id: Uuid) -> AppResult<User> {
        let user = self.get(id).await?;
        if !user.is_deleted() {
            return Err(AppError::validation("User is not archived"));
        }

        let restored = self.store.set_deleted_at(id, None).await?;
        info!(target_id = %id, "User restored");
        Ok(restored)
    }

    /// Sends a fresh invitation.
    pub async fn reinvite(&self, id: Uuid) -> AppResult<()> {
        let user = self.get(id).await?;
        self.auth.send_invitation(&user).await.map_err(|e| {
            warn!(target_id = %id, error = %e, "Reinvitation failed");
            AppError::validation("Failed to send invitation email")
        })
    }
}
