//! User management through the HTTP API.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn create_user(app: &TestApp, username: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "full_name": username.to_uppercase(),
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_user_crud() {
    let app = TestApp::new().await;
    let id = create_user(&app, "alice").await;

    let response = app.request("GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_active"], true);

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(json!({ "full_name": "Alice Liddell", "is_active": false })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["full_name"], "Alice Liddell");
    assert_eq!(response.data()["is_active"], false);

    let response = app
        .request("DELETE", &format!("/api/users/{id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    create_user(&app, "bob").await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({
                "username": "bob",
                "email": "other@example.com",
                "full_name": "Other Bob",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Username already exists");
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({
                "username": "carol",
                "email": "nope",
                "full_name": "Carol",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_and_stats() {
    let app = TestApp::new().await;
    create_user(&app, "dave").await;
    let erin = create_user(&app, "erin").await;
    app.request(
        "PUT",
        &format!("/api/users/{erin}"),
        Some(json!({ "is_active": false })),
    )
    .await;

    let response = app.request("GET", "/api/users?is_active=true", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 1);
    assert_eq!(response.data()["items"][0]["username"], "dave");

    let response = app.request("GET", "/api/users/stats/summary", None).await;
    assert_eq!(
        response.data(),
        &json!({ "total_users": 2, "active_users": 1, "inactive_users": 1 })
    );
}
