//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use roster_auth::{PasswordHasher, PasswordValidator, TokenIssuer};
use roster_core::config::AppConfig;
use roster_core::result::AppResult;
use roster_database::UserStore;
use roster_service::{
    AuthService, MailService, MailTransport, ProfileService, SeedService, UserService,
};

use crate::middleware::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// User persistence (PostgreSQL or in-memory)
    pub store: Arc<dyn UserStore>,
    /// Login, password and token flows
    pub auth_service: Arc<AuthService>,
    /// Administrative user management
    pub user_service: Arc<UserService>,
    /// Self-service profile
    pub profile_service: Arc<ProfileService>,
    /// Non-production seed data
    pub seed_service: Arc<SeedService>,
    /// Per-client request throttling
    pub rate_limiter: RateLimiter,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.environment)
            .field("auth_service", &self.auth_service)
            .finish()
    }
}

impl AppState {
    /// Wires every service on top of `store` and the mail `transport`.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn UserStore>,
        transport: Arc<dyn MailTransport>,
    ) -> AppResult<Self> {
        let hasher = Arc::new(PasswordHasher::default());
        let validator = Arc::new(PasswordValidator::new(&config.auth));
        let issuer = Arc::new(TokenIssuer::new(&config.auth)?);

        let mail = Arc::new(MailService::new(
            &config.mail,
            config.server.origin.clone(),
            transport,
        ));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store),
            issuer,
            Arc::clone(&hasher),
            validator,
            mail,
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&store),
            Arc::clone(&auth_service),
            Arc::clone(&hasher),
        ));
        let profile_service = Arc::new(ProfileService::new(Arc::clone(&store)));
        let seed_service = Arc::new(SeedService::new(
            Arc::clone(&store),
            Arc::clone(&user_service),
            hasher,
            config.environment,
        ));

        let rate_limiter = RateLimiter::from_config(&config.server.rate_limit);

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            user_service,
            profile_service,
            seed_service,
            rate_limiter,
        })
    }
}
