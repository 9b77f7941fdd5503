//! Integration tests for the self-service profile endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp};
use roster_entity::UserRole;

#[tokio::test]
async fn test_get_me_returns_profile() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let response = app.request("GET", "/api/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let me = &response.body["data"]["user"];
    assert_eq!(me["id"], user.id.to_string());
    assert_eq!(me["label"], "Test User");
    assert!(me["lastLoginAt"].is_string());
}

#[tokio::test]
async fn test_update_me_changes_names_and_avatar() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let response = app
        .request(
            "PATCH",
            "/api/me",
            Some(json!({
                "firstName": "  Ada ",
                "lastName": "Lovelace",
                "imgUrl": "https://cdn.example.com/ada.png",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["firstName"], "Ada");
    assert_eq!(response.body["data"]["label"], "Ada Lovelace");
    assert_eq!(
        response.body["data"]["imgUrl"],
        "https://cdn.example.com/ada.png"
    );
}

#[tokio::test]
async fn test_update_me_cannot_change_role() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let response = app
        .request(
            "PATCH",
            "/api/me",
            Some(json!({ "lastName": "Byron", "role": "ADMIN" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["role"], "USER");
}

#[tokio::test]
async fn test_update_me_rejects_bad_input() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let short = app
        .request("PATCH", "/api/me", Some(json!({ "firstName": "A" })), Some(&token))
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let avatar = app
        .request(
            "PATCH",
            "/api/me",
            Some(json!({ "imgUrl": "javascript:alert(1)" })),
            Some(&token),
        )
        .await;
    assert_eq!(avatar.status, StatusCode::BAD_REQUEST);
    assert!(avatar.body["error"]["details"]["imgUrl"].is_array());
}

#[tokio::test]
async fn test_archived_user_token_stops_working() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin("root@example.com").await;
    let user = app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    app.request(
        "DELETE",
        &format!("/api/users/{}", user.id),
        None,
        Some(&admin_token),
    )
    .await;

    let response = app.request("GET", "/api/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
