//! Registration, login, and token refresh tests.

mod common;

use axum::http::StatusCode;
use common::{app, DEFAULT_PASSWORD};
use serde_json::json;

// ===========================================================================
// Registration
// ===========================================================================

#[tokio::test]
async fn register_new_user() {
    let app = app().await;

    let resp = app
        .post_json(
            "/register/",
            json!({"username": "auth_reg_new", "password": "hunter2hunter2"}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["message"].as_str().unwrap(), "registration complete");

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'auth_reg_new'")
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn register_duplicate_username() {
    let app = app().await;

    let body = json!({"username": "auth_reg_dup", "password": "hunter2hunter2"});
    let resp = app.post_json("/register/", body.clone(), None).await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = app.post_json("/register/", body, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "registration failed");
    assert_eq!(resp.error_detail(), "username already taken");

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'auth_reg_dup'")
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn register_empty_fields() {
    let app = app().await;

    let resp = app
        .post_json("/register/", json!({"username": "", "password": "x"}), None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .post_json(
            "/register/",
            json!({"username": "auth_reg_nopass", "password": "   "}),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_detail(), "username and password are required");
}

#[tokio::test]
async fn failure_bodies_use_published_keys() {
    let app = app().await;

    let resp = app
        .post_json("/register/", json!({"username": "", "password": ""}), None)
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let body = resp.json();
    assert!(body["오류"].is_string());
    assert!(body["상세"].is_string());
    assert!(body["error"].is_null());
}

// ===========================================================================
// Login
// ===========================================================================

#[tokio::test]
async fn login_success() {
    let app = app().await;
    let user = app.create_user("auth_login_ok").await;

    let resp = app
        .post_json(
            "/login/",
            json!({"username": user.username, "password": DEFAULT_PASSWORD}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(body["message"].as_str().unwrap(), "login successful");
}

#[tokio::test]
async fn login_wrong_password() {
    let app = app().await;
    let user = app.create_user("auth_login_badpw").await;

    let resp = app
        .post_json(
            "/login/",
            json!({"username": user.username, "password": "not-the-password"}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error_message(), "invalid credentials");
}

#[tokio::test]
async fn login_unknown_user() {
    let app = app().await;

    let resp = app
        .post_json(
            "/login/",
            json!({"username": "auth_login_ghost", "password": "whatever123"}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

// ===========================================================================
// Refresh
// ===========================================================================

#[tokio::test]
async fn refresh_valid_token() {
    let app = app().await;
    let user = app.create_user("auth_refresh_ok").await;

    let resp = app
        .post_json(
            "/refresh/",
            json!({"refresh_token": user.refresh_token}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    let new_access = body["access_token"].as_str().unwrap().to_string();
    assert!(!new_access.is_empty());
    assert_eq!(body["message"].as_str().unwrap(), "token refreshed");

    // The refreshed access token must authenticate on its own.
    let resp = app.get("/newsfeed/", Some(&new_access)).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_tampered_token() {
    let app = app().await;
    let user = app.create_user("auth_refresh_tamper").await;

    let mut tampered = user.refresh_token.clone();
    tampered.pop();
    tampered.push('A');

    let resp = app
        .post_json("/refresh/", json!({"refresh_token": tampered}), None)
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "invalid refresh token");
}

#[tokio::test]
async fn refresh_missing_token() {
    let app = app().await;

    let resp = app
        .post_json("/refresh/", json!({"refresh_token": ""}), None)
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "refresh_token is required");
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let app = app().await;
    let user = app.create_user("auth_refresh_wrongtyp").await;

    // An access token is not acceptable where a refresh token is expected.
    let resp = app
        .post_json(
            "/refresh/",
            json!({"refresh_token": user.access_token}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// ===========================================================================
// Guard
// ===========================================================================

#[tokio::test]
async fn protected_route_requires_token() {
    let app = app().await;

    let resp = app.get("/newsfeed/", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app.get("/newsfeed/", Some("not-a-real-token")).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}
