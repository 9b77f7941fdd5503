//! Authentication service: credentials, password changes, reset and
//! invitation tokens, and access token authentication.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use roster_auth::password::{PasswordHasher, PasswordValidator};
use roster_auth::token::{Audience, TokenIssuer};
use roster_core::error::AppError;
use roster_core::result::AppResult;
use roster_database::UserStore;
use roster_entity::user::{User, UserProfile};

use crate::context::RequestContext;
use crate::mail::MailService;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";

/// Successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub user: UserProfile,
    pub access_token: String,
    /// Access token lifetime in milliseconds.
    pub expires_in_ms: u64,
}

/// Handles credentials and every token audience.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    issuer: Arc<TokenIssuer>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    mail: Arc<MailService>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        store: Arc<dyn UserStore>,
        issuer: Arc<TokenIssuer>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        mail: Arc<MailService>,
    ) -> Self {
        Self {
            store,
            issuer,
            hasher,
            validator,
            mail,
        }
    }

    /// Returns the token issuer.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Checks credentials and issues an access token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let mut user = self
            .store
            .find_by_email(email)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let issued = self.issuer.issue(&user, Audience::Access)?;
        self.store.touch_last_login(user.id).await?;
        user.last_login_at = Some(Utc::now());

        info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            user: user.profile(),
            access_token: issued.token,
            expires_in_ms: issued.expires_in_ms,
        })
    }

    /// Records the logout time. Clearing the cookie is up to the caller.
    pub async fn logout(&self, ctx: &RequestContext) -> AppResult<()> {
        self.store.touch_last_login(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, "User logged out");
        Ok(())
    }

    /// Replaces the caller's password after checking the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<String> {
        let user = self
            .store
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::authentication("User not found"))?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::authentication("Password is incorrect"));
        }

        self.validator.validate(new_password)?;
        let hash = self.hasher.hash_password(new_password)?;
        self.store.update_password(user.id, &hash).await?;

        info!(user_id = %user.id, "Password changed");
        Ok("Password has been changed successfully".to_string())
    }

    /// Mails a reset link. Unknown or archived addresses are ignored so the
    /// response never reveals whether an account exists.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let Some(user) = self
            .store
            .find_by_email(email)
            .await?
            .filter(|u| !u.is_deleted())
        else {
            debug!("Password reset requested for unknown or archived account");
            return Ok(());
        };

        let issued = self.issuer.issue(&user, Audience::Reset)?;
        if let Err(e) = self.mail.send_password_reset(&user, &issued.token).await {
            warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
        }
        Ok(())
    }

    /// Resolves the user a reset or invitation token was issued to.
    ///
    /// Every token problem collapses into one validation error.
    pub async fn validate_reset_token(&self, token: &str) -> AppResult<User> {
        let invalid = || AppError::validation(INVALID_RESET_TOKEN);

        let claims = TokenIssuer::peek(token).map_err(|_| invalid())?;
        let audience = match claims.audience() {
            Some(audience @ (Audience::Reset | Audience::Invitation)) => audience,
            _ => return Err(invalid()),
        };

        let user = self
            .store
            .find_by_id(claims.sub)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or_else(invalid)?;

        self.issuer
            .verify_for_user(token, audience, &user)
            .map_err(|e| {
                debug!(user_id = %user.id, error = %e, "Reset token rejected");
                invalid()
            })?;

        Ok(user)
    }

    /// Sets a new password using a reset or invitation token.
    ///
    /// The new hash changes the derived secret, so the token cannot be
    /// replayed.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let user = self.validate_reset_token(token).await?;
        self.validator.validate(new_password)?;
        let hash = self.hasher.hash_password(new_password)?;
        self.store.update_password(user.id, &hash).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Issues an invitation token and mails it to `user`.
    pub async fn send_invitation(&self, user: &User) -> AppResult<()> {
        let issued = self.issuer.issue(user, Audience::Invitation)?;
        self.mail.send_invitation(user, &issued.token).await
    }

    /// Resolves the user behind an access token.
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.issuer.verify_access(token)?;

        let user = self
            .store
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.email == claims.email)
            .ok_or_else(|| AppError::authentication("User not found"))?;

        if user.is_deleted() {
            return Err(AppError::authentication("User account has been deactivated"));
        }
        Ok(user)
    }
}
