//! Video API endpoints

pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::{Multipart, State};
use axum::routing::{get, patch};

use crate::api::auth::{Auth, MaybeAuth};
use crate::api::extractors::{PathId, ValidatedQuery, VideoIdParam};
use crate::api::routes::types::{FeedVideoDto, VideoDto, VideoWithOwnerDto};
use crate::api::types::{ApiError, ApiResponse};
use crate::api::upload::{self, MediaKind, UploadForm};
use crate::data::files::MediaFolder;
use crate::data::types::{NewVideo, VideoPatch};
use crate::data::{ObjectStore, TransactionalService};
use crate::domain::views::{parse_sort, record_view, video_detail, video_feed};
use crate::domain::{Page, PageRequest, require_owner};

use types::{FeedQuery, PublishStateDto, resolve_duration};

/// Shared state for Video API endpoints
#[derive(Clone)]
pub struct VideosApiState {
    pub database: Arc<TransactionalService>,
    pub media: Arc<dyn ObjectStore>,
}

/// Build Video API routes
pub fn routes(database: Arc<TransactionalService>, media: Arc<dyn ObjectStore>) -> Router<()> {
    let state = VideosApiState { database, media };

    Router::new()
        .route("/", get(list_videos).post(publish_video))
        .route(
            "/{videoId}",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/{videoId}/toggle-publish", patch(toggle_publish))
        .with_state(state)
}

/// Filtered, sorted, paginated feed
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "videos",
    params(FeedQuery),
    responses(
        (status = 200, description = "One page of the feed"),
        (status = 400, description = "Invalid sortBy", body = crate::api::types::ErrorBody),
        (status = 404, description = "No videos found for the given criteria", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_videos(
    State(state): State<VideosApiState>,
    ValidatedQuery(query): ValidatedQuery<FeedQuery>,
) -> Result<ApiResponse<Page<FeedVideoDto>>, ApiError> {
    let sort = parse_sort(query.sort_by.as_deref(), query.sort_type.as_deref())?;
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());

    let page = video_feed(
        state.database.repository().as_ref(),
        &query.filter(),
        sort,
        request,
    )
    .await?;

    Ok(ApiResponse::ok(
        page.map(|row| FeedVideoDto::new(row.video, row.owner)),
        "Videos fetched successfully",
    ))
}

/// Upload a video with its thumbnail
#[utoipa::path(
    post,
    path = "/api/v1/videos",
    tag = "videos",
    request_body(content_type = "multipart/form-data", description = "title, description, category, videoFile (video), thumbnail (image), duration (optional seconds)"),
    responses(
        (status = 201, description = "Video published", body = VideoDto),
        (status = 400, description = "Missing file or field", body = crate::api::types::ErrorBody),
        (status = 500, description = "Media storage failed", body = crate::api::types::ErrorBody)
    )
)]
pub async fn publish_video(
    State(state): State<VideosApiState>,
    Auth(caller): Auth,
    multipart: Multipart,
) -> Result<ApiResponse<VideoDto>, ApiError> {
    let mut form = UploadForm::parse(multipart).await?;

    let (Some(video_file), Some(thumbnail)) = (
        form.take_file("videoFile", MediaKind::Video)?,
        form.take_file("thumbnail", MediaKind::Image)?,
    ) else {
        return Err(ApiError::bad_request("Video file and thumbnail are required"));
    };

    let (Some(title), Some(description)) = (form.text("title"), form.text("description")) else {
        return Err(ApiError::bad_request("Title and description are required"));
    };
    let title = title.to_string();
    let description = description.to_string();
    let category = form.text("category").unwrap_or_default().to_string();

    let media = state.media.as_ref();
    let stored_video = upload::store(media, MediaFolder::Videos, video_file).await?;
    let stored_thumbnail = match upload::store(media, MediaFolder::Thumbnails, thumbnail).await {
        Ok(stored) => stored,
        Err(e) => {
            upload::discard(media, &stored_video.url).await;
            return Err(e);
        }
    };

    let new_video = NewVideo {
        owner_id: caller.user_id().to_string(),
        title,
        description,
        category,
        video_file: stored_video.url.clone(),
        thumbnail: stored_thumbnail.url.clone(),
        duration: resolve_duration(stored_video.duration, form.text("duration")),
    };

    let video = match state.database.repository().create_video(&new_video).await {
        Ok(video) => video,
        Err(e) => {
            upload::discard(media, &stored_video.url).await;
            upload::discard(media, &stored_thumbnail.url).await;
            return Err(ApiError::from_data(e));
        }
    };

    tracing::debug!(video_id = %video.id, owner_id = %video.owner_id, "Video published");
    Ok(ApiResponse::created(
        VideoDto::from(video),
        "Video published successfully",
    ))
}

/// Video detail. Counts a view, and for a signed-in caller appends to watch history.
#[utoipa::path(
    get,
    path = "/api/v1/videos/{videoId}",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video with owner", body = VideoWithOwnerDto),
        (status = 400, description = "Invalid video ID", body = crate::api::types::ErrorBody),
        (status = 404, description = "Video not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_video(
    State(state): State<VideosApiState>,
    caller: MaybeAuth,
    video_id: PathId<VideoIdParam>,
) -> Result<ApiResponse<VideoWithOwnerDto>, ApiError> {
    let repo = state.database.repository();
    let mut detail = video_detail(repo.as_ref(), &video_id).await?;

    record_view(repo.as_ref(), &video_id, caller.user_id()).await?;
    detail.video.views += 1;

    Ok(ApiResponse::ok(
        VideoWithOwnerDto::new(detail.video, detail.owner),
        "Video fetched successfully",
    ))
}

/// Update title, description, category and/or thumbnail
#[utoipa::path(
    patch,
    path = "/api/v1/videos/{videoId}",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    request_body(content_type = "multipart/form-data", description = "title, description, category, thumbnail (all optional)"),
    responses(
        (status = 200, description = "Video updated", body = VideoDto),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Video not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_video(
    State(state): State<VideosApiState>,
    Auth(caller): Auth,
    video_id: PathId<VideoIdParam>,
    multipart: Multipart,
) -> Result<ApiResponse<VideoDto>, ApiError> {
    let repo = state.database.repository();
    let existing = require_owner(
        caller.user_id(),
        repo.get_video(&video_id).await?,
        "update",
    )?;

    let mut form = UploadForm::parse(multipart).await?;
    let thumbnail = form.take_file("thumbnail", MediaKind::Image)?;

    let media = state.media.as_ref();
    let new_thumbnail = match thumbnail {
        Some(upload) => Some(upload::store(media, MediaFolder::Thumbnails, upload).await?.url),
        None => None,
    };

    let patch = VideoPatch {
        title: form.text("title").map(str::to_string),
        description: form.text("description").map(str::to_string),
        category: form.text("category").map(str::to_string),
        thumbnail: new_thumbnail.clone(),
    };

    let updated = if patch.is_empty() {
        Ok(Some(existing.clone()))
    } else {
        repo.update_video(&video_id, &patch).await
    };

    match updated {
        Ok(Some(video)) => {
            if new_thumbnail.is_some() {
                upload::discard(media, &existing.thumbnail).await;
            }
            Ok(ApiResponse::ok(
                VideoDto::from(video),
                "Video updated successfully",
            ))
        }
        Ok(None) => {
            if let Some(url) = &new_thumbnail {
                upload::discard(media, url).await;
            }
            Err(ApiError::not_found("Video not found"))
        }
        Err(e) => {
            if let Some(url) = &new_thumbnail {
                upload::discard(media, url).await;
            }
            Err(ApiError::from_data(e))
        }
    }
}

/// Delete a video and its media objects
#[utoipa::path(
    delete,
    path = "/api/v1/videos/{videoId}",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted"),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Video not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn delete_video(
    State(state): State<VideosApiState>,
    Auth(caller): Auth,
    video_id: PathId<VideoIdParam>,
) -> Result<ApiResponse<()>, ApiError> {
    let repo = state.database.repository();
    let video = require_owner(
        caller.user_id(),
        repo.get_video(&video_id).await?,
        "delete",
    )?;

    if !repo.delete_video(&video.id).await? {
        return Err(ApiError::not_found("Video not found"));
    }

    upload::discard(state.media.as_ref(), &video.video_file).await;
    upload::discard(state.media.as_ref(), &video.thumbnail).await;

    tracing::debug!(video_id = %video.id, "Video deleted");
    Ok(ApiResponse::ok((), "Video deleted successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/videos/{videoId}/toggle-publish",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Publish state flipped", body = PublishStateDto),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Video not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn toggle_publish(
    State(state): State<VideosApiState>,
    Auth(caller): Auth,
    video_id: PathId<VideoIdParam>,
) -> Result<ApiResponse<PublishStateDto>, ApiError> {
    let repo = state.database.repository();
    let video = require_owner(
        caller.user_id(),
        repo.get_video(&video_id).await?,
        "modify",
    )?;

    let is_published = !video.is_published;
    if !repo.set_video_published(&video.id, is_published).await? {
        return Err(ApiError::not_found("Video not found"));
    }

    let message = if is_published {
        "Video is now published"
    } else {
        "Video is now unpublished"
    };
    Ok(ApiResponse::ok(PublishStateDto { is_published }, message))
}
