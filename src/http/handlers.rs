use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::auth::AuthService;
use crate::app::feed::{FeedEntry, FeedService};
use crate::app::posts::PostService;
use crate::app::social::SocialService;
use crate::http::{AppError, AuthUser};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse { status })
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        state.db.clone(),
        state.paseto_access_key,
        state.paseto_refresh_key,
        state.access_ttl_minutes,
        state.refresh_ttl_days,
    )
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::bad_request_with_detail(
            "registration failed",
            "username and password are required",
        ));
    }

    auth_service(&state)
        .register(payload.username.trim(), &payload.password)
        .await
        .map_err(|err| {
            if let Some(sqlx_err) = err.downcast_ref::<sqlx::Error>() {
                if let Some(db_err) = sqlx_err.as_database_error() {
                    // 23505 = unique_violation on users.username
                    if db_err.code().as_deref() == Some("23505") {
                        return AppError::bad_request_with_detail(
                            "registration failed",
                            "username already taken",
                        );
                    }
                }
            }
            tracing::error!(error = ?err, "failed to register user");
            AppError::internal("failed to register user")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "registration complete",
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub message: &'static str,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::unauthorized("invalid credentials"));
    }

    let tokens = auth_service(&state)
        .login(payload.username.trim(), &payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to login");
            AppError::internal("failed to login")
        })?;

    match tokens {
        Some(tokens) => Ok(Json(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            message: "login successful",
        })),
        None => Err(AppError::unauthorized("invalid credentials")),
    }
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub message: &'static str,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token is required"));
    }

    let access_token = auth_service(&state)
        .refresh(&payload.refresh_token)
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to refresh token");
            AppError::internal("failed to refresh token")
        })?;

    match access_token {
        Some(access_token) => Ok(Json(RefreshResponse {
            access_token,
            message: "token refreshed",
        })),
        None => Err(AppError::bad_request("invalid refresh token")),
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CreatePostResponse {
    pub id: Uuid,
    pub title: String,
    pub contents: String,
    pub image_url: Option<String>,
    pub message: &'static str,
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePostResponse>), AppError> {
    let mut title: Option<String> = None;
    let mut contents: Option<String> = None;
    let mut image: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("malformed multipart body"))?
    {
        match field.name() {
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::bad_request("malformed multipart body"))?,
                );
            }
            Some("contents") => {
                contents = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| AppError::bad_request("malformed multipart body"))?,
                );
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or("image").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("malformed multipart body"))?;
                if !data.is_empty() {
                    image = Some((filename, data));
                }
            }
            _ => {}
        }
    }

    let title = title
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("title and contents are required"))?;
    let contents = contents
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("title and contents are required"))?;

    let image_key = match image {
        Some((filename, data)) => Some(state.media.store(&filename, &data).await.map_err(
            |err| {
                tracing::error!(error = ?err, "failed to store image");
                AppError::internal("failed to store image")
            },
        )?),
        None => None,
    };

    let service = PostService::new(state.db.clone());
    let post = service
        .create_post(auth.user_id, title, contents, image_key)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to create post");
            AppError::internal("failed to create post")
        })?;

    let image_url = post.image_key.as_deref().map(|key| state.media.public_url(key));

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            id: post.id,
            title: post.title,
            contents: post.contents,
            image_url,
            message: "post created",
        }),
    ))
}

#[derive(Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub contents: String,
}

pub async fn get_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<PostResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service.get_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to fetch post");
        AppError::internal("failed to fetch post")
    })?;

    match post {
        Some(post) => Ok(Json(PostResponse {
            id: post.id,
            title: post.title,
            contents: post.contents,
        })),
        None => Err(AppError::not_found("post not found")),
    }
}

// ---------------------------------------------------------------------------
// Follows
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct FollowRequest {
    pub followee_id: Uuid,
}

#[derive(Serialize)]
pub struct FollowResponse {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub message: &'static str,
}

pub async fn follow(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<FollowRequest>,
) -> Result<(StatusCode, Json<FollowResponse>), AppError> {
    let service = SocialService::new(state.db.clone());
    let edge = service
        .follow(auth.user_id, payload.followee_id)
        .await
        .map_err(|err| {
            tracing::error!(
                error = ?err,
                follower_id = %auth.user_id,
                followee_id = %payload.followee_id,
                "failed to follow user"
            );
            AppError::internal("failed to follow user")
        })?;

    match edge {
        Some(edge) => Ok((
            StatusCode::CREATED,
            Json(FollowResponse {
                follower_id: edge.follower_id,
                followee_id: edge.followee_id,
                message: "followed",
            }),
        )),
        None => Err(AppError::bad_request("user to follow not found")),
    }
}

/// Followee ids ride in one-field objects on the wire.
#[derive(Serialize)]
pub struct FolloweeEntry {
    pub followee_id: Uuid,
}

#[derive(Serialize)]
pub struct FollowListResponse {
    pub followees: Vec<FolloweeEntry>,
    pub message: &'static str,
}

pub async fn follow_list(
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<FollowListResponse>, AppError> {
    let service = SocialService::new(state.db.clone());
    let followees = service.list_followees(user_id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = %user_id, "failed to list followees");
        AppError::internal("failed to list followees")
    })?;

    Ok(Json(FollowListResponse {
        followees: followees
            .into_iter()
            .map(|followee_id| FolloweeEntry { followee_id })
            .collect(),
        message: "fetched follow list",
    }))
}

// ---------------------------------------------------------------------------
// Newsfeed
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct NewsfeedResponse {
    pub newsfeed: Vec<FeedEntry>,
    pub message: &'static str,
}

pub async fn newsfeed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<NewsfeedResponse>, AppError> {
    let service = FeedService::new(state.db.clone());
    let entries = service.get_newsfeed(auth.user_id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = %auth.user_id, "failed to build newsfeed");
        AppError::internal("failed to build newsfeed")
    })?;

    Ok(Json(NewsfeedResponse {
        newsfeed: entries,
        message: "fetched newsfeed",
    }))
}
