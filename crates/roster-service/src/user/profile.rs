//! Self-service profile operations.

use std::sync::Arc;

use tracing::info;

use roster_core::error::AppError;
use roster_core::result::AppResult;
use roster_database::UserStore;
use roster_entity::user::{UserChanges, UserProfile};

use crate::context::RequestContext;

/// Fields a user may change on their own profile. Email and role are not
/// among them.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub img_url: Option<String>,
}

/// Handles the caller's own profile.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn UserStore>,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Returns the caller's profile.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<UserProfile> {
        self.store
            .find_by_id(ctx.user_id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the caller's names and avatar.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> AppResult<UserProfile> {
        let changes = UserChanges {
            first_name: req.first_name,
            last_name: req.last_name,
            img_url: req.img_url,
            ..UserChanges::default()
        };
        let user = self.store.update(ctx.user_id, &changes).await?;

        info!(user_id = %ctx.user_id, "Profile updated");
        Ok(user.profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_entity::user::UserRole;

    use crate::testing::Harness;

    #[tokio::test]
    async fn test_update_leaves_role_and_email_alone() {
        let h = Harness::new();
        let user = h.user("ada@example.com", UserRole::User).await;
        let ctx = RequestContext::from_user(&user);

        let profile = h
            .profile
            .update(
                &ctx,
                UpdateProfileRequest {
                    first_name: Some("Ada".to_string()),
                    last_name: Some("Lovelace".to_string()),
                    img_url: Some("https://example.com/a.png".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.label, "Ada Lovelace");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.role, UserRole::User);
        assert_eq!(h.profile.me(&ctx).await.unwrap(), profile);
    }
}
