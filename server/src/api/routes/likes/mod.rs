//! Like API endpoints

pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};

use crate::api::auth::Auth;
use crate::api::extractors::{CommentIdParam, PathId, TweetIdParam, VideoIdParam};
use crate::api::types::{ApiError, ApiResponse};
use crate::data::TransactionalService;
use crate::data::types::LikeTarget;
use crate::domain::{Toggled, toggle_like};

use types::{LikeDto, LikedVideoDto};

/// Shared state for Like API endpoints
#[derive(Clone)]
pub struct LikesApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Like API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = LikesApiState { database };

    Router::new()
        .route("/toggle/v/{videoId}", post(toggle_video_like))
        .route("/toggle/c/{commentId}", post(toggle_comment_like))
        .route("/toggle/t/{tweetId}", post(toggle_tweet_like))
        .route("/videos", get(list_liked_videos))
        .with_state(state)
}

/// Toggle and answer 201 with the new like, or 200 with null after an unlike
async fn toggle(
    state: &LikesApiState,
    caller_id: &str,
    target: LikeTarget,
    noun: &str,
) -> Result<ApiResponse<Option<LikeDto>>, ApiError> {
    let outcome = toggle_like(state.database.repository().as_ref(), caller_id, &target).await?;
    Ok(match outcome {
        Toggled::Created(like) => {
            ApiResponse::created(Some(LikeDto::from(like)), format!("{} liked", noun))
        }
        Toggled::Deleted => ApiResponse::ok(None, format!("{} unliked", noun)),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/v/{videoId}",
    tag = "likes",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 201, description = "Video liked", body = LikeDto),
        (status = 200, description = "Video unliked"),
        (status = 400, description = "Invalid video ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn toggle_video_like(
    State(state): State<LikesApiState>,
    Auth(caller): Auth,
    video_id: PathId<VideoIdParam>,
) -> Result<ApiResponse<Option<LikeDto>>, ApiError> {
    toggle(&state, caller.user_id(), LikeTarget::Video(video_id.id), "Video").await
}

#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/c/{commentId}",
    tag = "likes",
    params(("commentId" = String, Path, description = "Comment ID")),
    responses(
        (status = 201, description = "Comment liked", body = LikeDto),
        (status = 200, description = "Comment unliked"),
        (status = 400, description = "Invalid Comment ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn toggle_comment_like(
    State(state): State<LikesApiState>,
    Auth(caller): Auth,
    comment_id: PathId<CommentIdParam>,
) -> Result<ApiResponse<Option<LikeDto>>, ApiError> {
    toggle(
        &state,
        caller.user_id(),
        LikeTarget::Comment(comment_id.id),
        "Comment",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/t/{tweetId}",
    tag = "likes",
    params(("tweetId" = String, Path, description = "Tweet ID")),
    responses(
        (status = 201, description = "Tweet liked", body = LikeDto),
        (status = 200, description = "Tweet unliked"),
        (status = 400, description = "Invalid Tweet ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn toggle_tweet_like(
    State(state): State<LikesApiState>,
    Auth(caller): Auth,
    tweet_id: PathId<TweetIdParam>,
) -> Result<ApiResponse<Option<LikeDto>>, ApiError> {
    toggle(&state, caller.user_id(), LikeTarget::Tweet(tweet_id.id), "Tweet").await
}

/// The caller's video likes, newest first
#[utoipa::path(
    get,
    path = "/api/v1/likes/videos",
    tag = "likes",
    responses(
        (status = 200, description = "Liked videos", body = Vec<LikedVideoDto>),
        (status = 401, description = "Not signed in", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_liked_videos(
    State(state): State<LikesApiState>,
    Auth(caller): Auth,
) -> Result<ApiResponse<Vec<LikedVideoDto>>, ApiError> {
    let likes: Vec<LikedVideoDto> = state
        .database
        .repository()
        .list_liked_videos(caller.user_id())
        .await?
        .into_iter()
        .map(LikedVideoDto::from)
        .collect();

    let message = if likes.is_empty() {
        "No liked videos found"
    } else {
        "Fetched liked videos"
    };
    Ok(ApiResponse::ok(likes, message))
}
