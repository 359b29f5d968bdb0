//! Comment API endpoints

pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::api::auth::Auth;
use crate::api::extractors::{
    CommentIdParam, PathId, ValidatedJson, ValidatedQuery, VideoIdParam,
};
use crate::api::types::{ApiError, ApiResponse};
use crate::data::TransactionalService;
use crate::domain::views::video_comments;
use crate::domain::{Page, PageRequest, require_owner};
use crate::utils::id::is_valid_id;

use types::{AddCommentRequest, CommentDto, CommentListItemDto, UpdateCommentRequest};

/// Shared state for Comment API endpoints
#[derive(Clone)]
pub struct CommentsApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Comment API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = CommentsApiState { database };

    Router::new()
        .route("/{videoId}", get(list_comments).post(add_comment))
        .route(
            "/c/{commentId}",
            patch(update_comment).delete(delete_comment),
        )
        .with_state(state)
}

/// `page` / `limit` as raw strings
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Comments of a video, newest first
#[utoipa::path(
    get,
    path = "/api/v1/comments/{videoId}",
    tag = "comments",
    params(("videoId" = String, Path, description = "Video ID"), PageQuery),
    responses(
        (status = 200, description = "One page of comments"),
        (status = 400, description = "Invalid video ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_comments(
    State(state): State<CommentsApiState>,
    video_id: PathId<VideoIdParam>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<ApiResponse<Page<CommentListItemDto>>, ApiError> {
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let page = video_comments(state.database.repository().as_ref(), &video_id, request).await?;

    Ok(ApiResponse::ok(
        page.map(CommentListItemDto::from),
        "Comments fetched successfully",
    ))
}

/// Comment on an existing video
#[utoipa::path(
    post,
    path = "/api/v1/comments/{videoId}",
    tag = "comments",
    params(("videoId" = String, Path, description = "Video ID")),
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentDto),
        (status = 400, description = "Missing content or invalid id", body = crate::api::types::ErrorBody),
        (status = 404, description = "Video not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn add_comment(
    State(state): State<CommentsApiState>,
    Auth(caller): Auth,
    Path(video_id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddCommentRequest>,
) -> Result<ApiResponse<CommentDto>, ApiError> {
    if !is_valid_id(&video_id) {
        return Err(ApiError::bad_request("Invalid video ID"));
    }

    let repo = state.database.repository();
    if repo.get_video(&video_id).await?.is_none() {
        return Err(ApiError::not_found("Video not found"));
    }

    let comment = repo
        .create_comment(&video_id, caller.user_id(), req.content.trim())
        .await?;

    Ok(ApiResponse::created(
        CommentDto::from(comment),
        "Comment added successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/comments/c/{commentId}",
    tag = "comments",
    params(("commentId" = String, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Comment not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_comment(
    State(state): State<CommentsApiState>,
    Auth(caller): Auth,
    comment_id: PathId<CommentIdParam>,
    ValidatedJson(req): ValidatedJson<UpdateCommentRequest>,
) -> Result<ApiResponse<CommentDto>, ApiError> {
    let repo = state.database.repository();
    require_owner(
        caller.user_id(),
        repo.get_comment(&comment_id).await?,
        "update",
    )?;

    let comment = repo
        .update_comment(&comment_id, req.content.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(ApiResponse::ok(
        CommentDto::from(comment),
        "Comment updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/c/{commentId}",
    tag = "comments",
    params(("commentId" = String, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Comment not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn delete_comment(
    State(state): State<CommentsApiState>,
    Auth(caller): Auth,
    comment_id: PathId<CommentIdParam>,
) -> Result<ApiResponse<()>, ApiError> {
    let repo = state.database.repository();
    let comment = require_owner(
        caller.user_id(),
        repo.get_comment(&comment_id).await?,
        "delete",
    )?;

    repo.delete_comment(&comment.id).await?;
    Ok(ApiResponse::ok((), "Comment deleted successfully"))
}
