//! Integration tests for the authentication flow.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use helpers::{PASSWORD, TestApp};
use roster_entity::UserRole;

#[tokio::test]
async fn test_login_success_sets_cookie() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ADA@example.com ", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["user"]["email"], "ada@example.com");
    assert!(response.body["data"]["user"].get("passwordHash").is_none());
    assert_eq!(response.body["data"]["expiresInMs"], 7u64 * 24 * 60 * 60 * 1000);

    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "Wrong123!" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "not-an-email", "password": "short" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert!(response.body["error"]["details"]["email"].is_array());
    assert!(response.body["error"]["details"]["password"].is_array());
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/me")
        .header(header::COOKIE, format!("access_token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_missing_and_garbage_tokens_are_unauthorized() {
    let app = TestApp::new();

    let missing = app.request("GET", "/api/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "UNAUTHORIZED");

    let garbage = app.request("GET", "/api/me", None, Some("not.a.jwt")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let response = app
        .request("GET", "/api/auth/logout", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["message"], "Logged out successfully");
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("access_token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let wrong = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "currentPassword": "Nope1234!", "newPassword": "Changed123!" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let ok = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "currentPassword": PASSWORD, "newPassword": "Changed123!" })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    app.login("ada@example.com", "Changed123!").await;
}

#[tokio::test]
async fn test_forgot_password_does_not_reveal_accounts() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;

    for email in ["ada@example.com", "nobody@example.com"] {
        let response = app
            .request(
                "POST",
                "/api/auth/forgot-password",
                Some(json!({ "email": email })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body["data"]["message"],
            "If the email exists, a password reset link has been sent"
        );
    }

    let sent = app.mail.messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert!(sent[0].text.contains("http://localhost:4200/auth/reset-password?token="));
}

#[tokio::test]
async fn test_reset_token_is_single_use() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    app.request(
        "POST",
        "/api/auth/forgot-password",
        Some(json!({ "email": "ada@example.com" })),
        None,
    )
    .await;
    let token = app.mailed_token("ada@example.com").await;

    let status = app
        .request(
            "POST",
            "/api/auth/reset-password/token-status",
            Some(json!({ "token": token })),
            None,
        )
        .await;
    assert_eq!(status.status, StatusCode::ACCEPTED);

    let reset = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "token": token, "newPassword": "Brand123!" })),
            None,
        )
        .await;
    assert_eq!(reset.status, StatusCode::NO_CONTENT);
    app.login("ada@example.com", "Brand123!").await;

    let replay = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "token": token, "newPassword": "Again123!" })),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
    assert_eq!(replay.body["error"]["message"], "Invalid or expired reset token");
}

#[tokio::test]
async fn test_password_change_invalidates_outstanding_reset_token() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    app.request(
        "POST",
        "/api/auth/forgot-password",
        Some(json!({ "email": "ada@example.com" })),
        None,
    )
    .await;
    let reset_token = app.mailed_token("ada@example.com").await;

    let access = app.login("ada@example.com", PASSWORD).await;
    let changed = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "currentPassword": PASSWORD, "newPassword": "Changed123!" })),
            Some(&access),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    let status = app
        .request(
            "POST",
            "/api/auth/reset-password/token-status",
            Some(json!({ "token": reset_token })),
            None,
        )
        .await;
    assert_eq!(status.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_access_token_cannot_reset_password() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let access = app.login("ada@example.com", PASSWORD).await;

    let response = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "token": access, "newPassword": "Brand123!" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_token_cannot_authenticate() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    app.request(
        "POST",
        "/api/auth/forgot-password",
        Some(json!({ "email": "ada@example.com" })),
        None,
    )
    .await;
    let reset_token = app.mailed_token("ada@example.com").await;

    let response = app.request("GET", "/api/me", None, Some(&reset_token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_rejects_weak_password() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    app.request(
        "POST",
        "/api/auth/forgot-password",
        Some(json!({ "email": "ada@example.com" })),
        None,
    )
    .await;
    let token = app.mailed_token("ada@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "token": token, "newPassword": "alllowercase" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}
