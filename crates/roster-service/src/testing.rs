//! Shared fixtures for service unit tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use roster_auth::password::{PasswordHasher, PasswordValidator};
use roster_auth::token::TokenIssuer;
use roster_core::config::{AuthConfig, MailConfig};
use roster_database::{MemoryUserStore, UserStore};
use roster_entity::user::{NewUser, User, UserRole};

use crate::auth::AuthService;
use crate::mail::{MailService, MemoryTransport};
use crate::user::{ProfileService, UserService};

pub(crate) struct Harness {
    pub store: Arc<MemoryUserStore>,
    pub mail: MemoryTransport,
    pub hasher: Arc<PasswordHasher>,
    pub auth: Arc<AuthService>,
    pub users: UserService,
    pub profile: ProfileService,
}

impl Harness {
    pub fn new() -> Self {
        let config = AuthConfig::default();
        let store = Arc::new(MemoryUserStore::new());
        let mail = MemoryTransport::new();
        let hasher = Arc::new(PasswordHasher::new());
        let mail_service = Arc::new(MailService::new(
            &MailConfig::default(),
            "http://localhost:3000",
            Arc::new(mail.clone()),
        ));
        let auth = Arc::new(AuthService::new(
            store.clone(),
            Arc::new(TokenIssuer::new(&config).unwrap()),
            hasher.clone(),
            Arc::new(PasswordValidator::new(&config)),
            mail_service,
        ));
        let users = UserService::new(store.clone(), auth.clone(), hasher.clone());
        let profile = ProfileService::new(store.clone());

        Self {
            store,
            mail,
            hasher,
            auth,
            users,
            profile,
        }
    }

    /// Inserts a user without paying for a real password hash.
    pub async fn user(&self, email: &str, role: UserRole) -> User {
        self.store
            .create(&NewUser {
                email: email.to_string(),
                password_hash: format!("unusable-{}", Uuid::new_v4()),
                role,
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap()
    }

    pub async fn user_with_password(&self, email: &str, password: &str, role: UserRole) -> User {
        self.store
            .create(&NewUser {
                email: email.to_string(),
                password_hash: self.hasher.hash_password(password).unwrap(),
                role,
                first_name: Some("Ada".to_string()),
                last_name: None,
            })
            .await
            .unwrap()
    }

    pub async fn archive(&self, id: Uuid) {
        self.store.set_deleted_at(id, Some(Utc::now())).await.unwrap();
    }

    /// Token from the newest mail sent to `email`.
    pub async fn last_token_for(&self, email: &str) -> String {
        let message = self.mail.last_to(email).await.unwrap();
        let start = message.text.find("token=").unwrap() + "token=".len();
        message.text[start..]
            .split_whitespace()
            .next()
            .unwrap()
            .to_string()
    }
}
