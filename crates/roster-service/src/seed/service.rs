//! Database seeding and admin bootstrap.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use roster_auth::password::PasswordHasher;
use roster_core::config::Environment;
use roster_core::error::AppError;
use roster_core::result::AppResult;
use roster_database::UserStore;
use roster_entity::user::{NewUser, User, UserRole};

use crate::user::{CreateUserRequest, UserService};

/// One fixture account.
#[derive(Debug, Clone, Copy)]
pub struct SeedUser {
    pub email: &'static str,
    pub password: &'static str,
    pub role: UserRole,
    pub first_name: &'static str,
    pub last_name: &'static str,
}

/// Accounts created by [`SeedService::reset`].
pub const SEED_USERS: [SeedUser; 3] = [
    SeedUser {
        email: "admin@example.com",
        password: "test123!",
        role: UserRole::Admin,
        first_name: "Admin",
        last_name: "User",
    },
    SeedUser {
        email: "john.doe@example.com",
        password: "admin123!",
        role: UserRole::User,
        first_name: "John",
        last_name: "Doe",
    },
    SeedUser {
        email: "jane.smith@example.com",
        password: "test123!",
        role: UserRole::User,
        first_name: "Jane",
        last_name: "Smith",
    },
];

const FIRST_NAMES: [&str; 8] = [
    "Alice", "Bruno", "Chloe", "Dmitri", "Elena", "Farid", "Grace", "Hugo",
];
const LAST_NAMES: [&str; 8] = [
    "Andersen", "Baker", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Haddad",
];

/// Resets and populates the user table outside production.
#[derive(Clone)]
pub struct SeedService {
    store: Arc<dyn UserStore>,
    users: Arc<UserService>,
    hasher: Arc<PasswordHasher>,
    environment: Environment,
}

impl SeedService {
    /// Creates a new seed service.
    pub fn new(
        store: Arc<dyn UserStore>,
        users: Arc<UserService>,
        hasher: Arc<PasswordHasher>,
        environment: Environment,
    ) -> Self {
        Self {
            store,
            users,
            hasher,
            environment,
        }
    }

    fn ensure_not_production(&self) -> AppResult<()> {
        if self.environment.is_production() {
            return Err(AppError::authorization(
                "Seed endpoints are not available in prod",
            ));
        }
        Ok(())
    }

    /// Deletes every user and inserts [`SEED_USERS`].
    pub async fn reset(&self) -> AppResult<Vec<User>> {
        self.ensure_not_production()?;

        let removed = self.store.delete_all().await?;
        let mut seeded = Vec::with_capacity(SEED_USERS.len());
        for seed in SEED_USERS {
            let user = self
                .store
                .create(&NewUser {
                    email: seed.email.to_string(),
                    password_hash: self.hasher.hash_password(seed.password)?,
                    role: seed.role,
                    first_name: Some(seed.first_name.to_string()),
                    last_name: Some(seed.last_name.to_string()),
                })
                .await?;
            seeded.push(user);
        }

        info!(removed, seeded = seeded.len(), "Database reset with seed users");
        Ok(seeded)
    }

    /// Creates one random user through the normal invitation path.
    pub async fn create_test_user(&self) -> AppResult<User> {
        self.ensure_not_production()?;

        let id = Uuid::new_v4();
        let bytes = id.as_bytes();
        let first = FIRST_NAMES[bytes[0] as usize % FIRST_NAMES.len()];
        let last = LAST_NAMES[bytes[1] as usize % LAST_NAMES.len()];
        let suffix = &id.simple().to_string()[..8];

        let user = self
            .users
            .create(CreateUserRequest {
                email: format!(
                    "{}.{}.{suffix}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                role: Some(UserRole::User),
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Test user created");
        Ok(user)
    }

    /// Creates an admin account and mails its invitation. Allowed in every
    /// environment; this is how the first admin of a deployment is made.
    pub async fn invite_admin(&self, email: &str) -> AppResult<User> {
        let user = self
            .users
            .create(CreateUserRequest {
                email: email.to_string(),
                first_name: Some("Admin".to_string()),
                last_name: Some("User".to_string()),
                role: Some(UserRole::Admin),
            })
            .await?;

        info!(user_id = %user.id, "Admin invited");
        Ok(user)
    }
}
