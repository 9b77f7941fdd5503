//! Integration tests for health checks, seed endpoints and the router shell.

mod helpers;

use axum::http::{StatusCode, header};

use helpers::TestApp;
use roster_core::config::Environment;
use roster_entity::UserRole;

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let check = app.request("GET", "/api/healthcheck", None, None).await;
    assert_eq!(check.status, StatusCode::OK);
    assert_eq!(check.body["data"]["status"], "ok");

    let live = app.request("GET", "/api/health/live", None, None).await;
    assert_eq!(live.body["data"]["status"], "alive");

    let ready = app.request("GET", "/api/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["data"]["status"], "ready");
    assert_eq!(ready.body["data"]["services"]["database"], "connected");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["message"], "Cannot GET /api/nope");
}

#[tokio::test]
async fn test_seed_reset_replaces_users() {
    let app = TestApp::new();
    app.create_user("stray@example.com", UserRole::User).await;

    let response = app.request("POST", "/api/seed/reset", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["users"].as_array().unwrap().len(), 3);

    app.login("admin@example.com", "test123!").await;
    let stray = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": "stray@example.com", "password": helpers::PASSWORD })),
            None,
        )
        .await;
    assert_eq!(stray.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seed_user_creates_invited_account() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/seed/user", None, None).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let email = response.body["data"]["email"].as_str().unwrap();
    assert!(email.ends_with("@example.com"));
    assert!(app.mail.last_to(email).await.is_some());
}

#[tokio::test]
async fn test_seed_endpoints_are_refused_in_production() {
    let app = TestApp::with_config(|c| {
        c.environment = Environment::Production;
        c.auth.jwt_secret = "a-production-grade-secret-value".to_string();
    });

    for path in ["/api/seed/reset", "/api/seed/user"] {
        let response = app.request("POST", path, None, None).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
    }
}

#[tokio::test]
async fn test_rate_limit_answers_429_with_retry_after() {
    let app = TestApp::with_config(|c| {
        c.server.rate_limit.enabled = true;
        c.server.rate_limit.max_requests = 2;
        c.server.rate_limit.window_seconds = 60;
    });

    for _ in 0..2 {
        let ok = app.request("GET", "/api/healthcheck", None, None).await;
        assert_eq!(ok.status, StatusCode::OK);
    }

    let limited = app.request("GET", "/api/healthcheck", None, None).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers.contains_key(header::RETRY_AFTER));
}
