use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

// Paths keep their trailing slashes; that is the published surface.

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn auth() -> Router<AppState> {
    Router::new()
        .route("/register/", post(handlers::register))
        .route("/login/", post(handlers::login))
        .route("/refresh/", post(handlers::refresh_token))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts/", post(handlers::create_post))
        .route("/posts/:id/", get(handlers::get_post))
}

pub fn social() -> Router<AppState> {
    Router::new()
        .route("/follow/", post(handlers::follow))
        .route("/follow/:user_id/", get(handlers::follow_list))
}

pub fn feed() -> Router<AppState> {
    Router::new().route("/newsfeed/", get(handlers::newsfeed))
}
