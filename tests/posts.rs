//! Post creation and retrieval tests.

mod common;

use axum::http::StatusCode;
use common::app;
use uuid::Uuid;

#[tokio::test]
async fn create_post() {
    let app = app().await;
    let user = app.create_user("post_create").await;

    let resp = app
        .post_multipart(
            "/posts/",
            &[("title", "first post"), ("contents", "hello world")],
            None,
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["title"].as_str().unwrap(), "first post");
    assert_eq!(body["contents"].as_str().unwrap(), "hello world");
    assert!(body["image_url"].is_null());
    assert_eq!(body["message"].as_str().unwrap(), "post created");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn create_post_without_title() {
    let app = app().await;
    let user = app.create_user("post_no_title").await;

    let resp = app
        .post_multipart(
            "/posts/",
            &[("contents", "body without a title")],
            None,
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "title and contents are required");

    // Nothing persisted.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn create_post_without_contents() {
    let app = app().await;
    let user = app.create_user("post_no_contents").await;

    let resp = app
        .post_multipart(
            "/posts/",
            &[("title", "a title"), ("contents", "   ")],
            None,
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_post_with_image() {
    let app = app().await;
    let user = app.create_user("post_image").await;

    let image_bytes: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];
    let resp = app
        .post_multipart(
            "/posts/",
            &[("title", "with image"), ("contents", "look at this")],
            Some(("photo.png", image_bytes)),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    let image_url = body["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/media/"));
    assert!(image_url.ends_with(".png"));

    // Stored image is served back under /media/.
    let resp = app.get(&image_url, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.bytes(), image_bytes);
}

#[tokio::test]
async fn create_post_requires_auth() {
    let app = app().await;

    let resp = app
        .post_multipart(
            "/posts/",
            &[("title", "t"), ("contents", "c")],
            None,
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_post() {
    let app = app().await;
    let user = app.create_user("post_get").await;
    let post_id = app
        .create_post_for_user(user.id, "stored title", "stored contents")
        .await;

    let resp = app.get(&format!("/posts/{}/", post_id), None).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["id"].as_str().unwrap(), post_id.to_string());
    assert_eq!(body["title"].as_str().unwrap(), "stored title");
    assert_eq!(body["contents"].as_str().unwrap(), "stored contents");
}

#[tokio::test]
async fn get_post_unknown_id() {
    let app = app().await;

    let resp = app.get(&format!("/posts/{}/", Uuid::new_v4()), None).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "post not found");
}
