//! Integration tests for admin user management.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp};
use roster_entity::UserRole;

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let app = TestApp::new();
    app.create_user("ada@example.com", UserRole::User).await;
    let token = app.login("ada@example.com", PASSWORD).await;

    let response = app.request("GET", "/api/users", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_create_user_sends_invitation() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({
                "email": "New.Person@Example.com",
                "firstName": "New",
                "lastName": "Person",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["email"], "new.person@example.com");
    assert_eq!(response.body["data"]["role"], "USER");
    assert_eq!(response.body["data"]["label"], "New Person");

    let invitation = app.mailed_token("new.person@example.com").await;
    let accepted = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "token": invitation, "newPassword": "Welcome123!" })),
            None,
        )
        .await;
    assert_eq!(accepted.status, StatusCode::NO_CONTENT);
    app.login("new.person@example.com", "Welcome123!").await;
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;
    app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "email": "ada@example.com" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_rejects_script_in_name() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({
                "email": "x@example.com",
                "firstName": "<script>alert(1)</script>",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]["details"]["firstName"].is_array());
}

#[tokio::test]
async fn test_list_paginates_and_searches() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;
    for i in 0..4 {
        app.create_user(&format!("member{i}@example.com"), UserRole::User)
            .await;
    }

    let page = app
        .request("GET", "/api/users?page=2&limit=2", None, Some(&token))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["data"]["total"], 5);
    assert_eq!(page.body["data"]["totalPages"], 3);
    assert_eq!(page.body["data"]["data"].as_array().unwrap().len(), 2);

    let search = app
        .request("GET", "/api/users?search=member3", None, Some(&token))
        .await;
    assert_eq!(search.body["data"]["total"], 1);
    assert_eq!(
        search.body["data"]["data"][0]["email"],
        "member3@example.com"
    );

    let bad = app
        .request("GET", "/api/users?limit=500", None, Some(&token))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_id_is_a_validation_error() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;

    let response = app
        .request("GET", "/api/users/not-a-uuid", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_single_admin_cannot_be_deleted_or_demoted() {
    let app = TestApp::new();
    let (admin, token) = app.admin("root@example.com").await;
    let path = format!("/api/users/{}", admin.id);

    let delete = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(delete.status, StatusCode::BAD_REQUEST);
    assert_eq!(delete.error_code(), "LAST_ADMIN");

    let demote = app
        .request("PATCH", &path, Some(json!({ "role": "USER" })), Some(&token))
        .await;
    assert_eq!(demote.status, StatusCode::BAD_REQUEST);
    assert_eq!(demote.error_code(), "LAST_ADMIN");
}

#[tokio::test]
async fn test_second_admin_can_be_demoted_and_deleted() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;
    let other = app.create_user("deputy@example.com", UserRole::Admin).await;
    let path = format!("/api/users/{}", other.id);

    let demote = app
        .request("PATCH", &path, Some(json!({ "role": "USER" })), Some(&token))
        .await;
    assert_eq!(demote.status, StatusCode::OK);
    assert_eq!(demote.body["data"]["role"], "USER");

    let promote = app
        .request("PATCH", &path, Some(json!({ "role": "ADMIN" })), Some(&token))
        .await;
    assert_eq!(promote.status, StatusCode::OK);

    let delete = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(delete.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_admin_cannot_delete_self_when_others_exist() {
    let app = TestApp::new();
    let (admin, token) = app.admin("root@example.com").await;
    app.create_user("deputy@example.com", UserRole::Admin).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{}", admin.id),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_soft_delete_then_restore_keeps_identity() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;
    let user = app.create_user("ada@example.com", UserRole::User).await;
    let path = format!("/api/users/{}", user.id);

    let delete = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(delete.status, StatusCode::NO_CONTENT);

    let hidden = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(hidden.body["data"]["total"], 1);
    let shown = app
        .request("GET", "/api/users?includeArchived=true", None, Some(&token))
        .await;
    assert_eq!(shown.body["data"]["total"], 2);

    let archived = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(archived.status, StatusCode::UNAUTHORIZED);

    let recreate = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "email": "ada@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(recreate.status, StatusCode::CONFLICT);

    let restored = app
        .request("POST", &format!("{path}/restore"), None, Some(&token))
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.body["data"]["id"], user.id.to_string());
    assert_eq!(restored.body["data"]["email"], "ada@example.com");
    assert_eq!(restored.body["data"]["role"], "USER");
    assert!(restored.body["data"]["deletedAt"].is_null());

    app.login("ada@example.com", PASSWORD).await;
}

#[tokio::test]
async fn test_reinvite_mails_a_fresh_invitation() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;
    let user = app.create_user("ada@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{}/reinvite", user.id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert!(app.mail.last_to("ada@example.com").await.is_some());

    app.mail.set_failing(true);
    let failed = app
        .request(
            "POST",
            &format!("/api/users/{}/reinvite", user.id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(failed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;

    let response = app
        .request(
            "GET",
            &format!("/api/users/{}", uuid::Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_far_past_the_last_page_is_empty() {
    let app = TestApp::new();
    let (_, token) = app.admin("root@example.com").await;

    let response = app
        .request(
            "GET",
            "/api/users?page=18446744073709551615&limit=100",
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 1);
    assert!(response.body["data"]["data"].as_array().unwrap().is_empty());
    assert_eq!(response.body["data"]["hasNext"], false);
}
