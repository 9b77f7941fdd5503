//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use roster_api::{AppState, build_app};
use roster_auth::PasswordHasher;
use roster_core::config::{AppConfig, DatabaseBackend, Environment, MailTransportKind};
use roster_database::{MemoryUserStore, UserStore};
use roster_entity::{NewUser, User, UserRole};
use roster_service::MemoryTransport;

/// Password every helper-created account logs in with.
pub const PASSWORD: &str = "Secret123!";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// In-memory store behind the router
    pub store: Arc<MemoryUserStore>,
    /// Captures every mail the services send
    pub mail: Arc<MemoryTransport>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application in the `test` environment
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test application after adjusting the default test config
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.environment = Environment::Test;
        config.database.backend = DatabaseBackend::Memory;
        config.database.run_migrations = false;
        config.mail.transport = MailTransportKind::Memory;
        config.server.rate_limit.enabled = false;
        config.server.origin = "http://localhost:4200".to_string();
        adjust(&mut config);

        let store = Arc::new(MemoryUserStore::new());
        let mail = Arc::new(MemoryTransport::new());
        let state = AppState::new(config.clone(), store.clone(), mail.clone())
            .expect("Failed to build app state");

        Self {
            router: build_app(state),
            store,
            mail,
            config,
        }
    }

    /// Insert an account directly into the store
    pub async fn create_user(&self, email: &str, role: UserRole) -> User {
        let hash = PasswordHasher::default()
            .hash_password(PASSWORD)
            .expect("Failed to hash password");

        self.store
            .create(&NewUser {
                email: email.to_string(),
                password_hash: hash,
                role,
                first_name: Some("Test".to_string()),
                last_name: Some("User".to_string()),
            })
            .await
            .expect("Failed to create test user")
    }

    /// Login and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["accessToken"]
            .as_str()
            .expect("No accessToken in login response")
            .to_string()
    }

    /// Create an admin and return it together with its access token
    pub async fn admin(&self, email: &str) -> (User, String) {
        let user = self.create_user(email, UserRole::Admin).await;
        let token = self.login(email, PASSWORD).await;
        (user, token)
    }

    /// Token from the link in the last mail sent to `email`
    pub async fn mailed_token(&self, email: &str) -> String {
        let message = self
            .mail
            .last_to(email)
            .await
            .unwrap_or_else(|| panic!("No mail sent to {email}"));

        let start = message
            .text
            .find("token=")
            .expect("No token link in mail body")
            + "token=".len();
        message.text[start..]
            .split_whitespace()
            .next()
            .expect("Empty token link")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = match body {
            Some(body) => req
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when empty
    pub body: Value,
}

impl TestResponse {
    /// The `error.code` of an error envelope
    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}
