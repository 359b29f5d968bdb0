//! Playlist API endpoints
//!
//! Reads are public. Every mutation is limited to the playlist owner.

pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::{get, patch, post};

use crate::api::auth::Auth;
use crate::api::extractors::{PathId, PlaylistIdParam, PlaylistVideoPath, UserIdParam, ValidatedJson};
use crate::api::types::{ApiError, ApiResponse};
use crate::data::TransactionalService;
use crate::data::types::PlaylistRow;
use crate::domain::views::user_playlists;
use crate::domain::{DomainError, require_owner};

use types::{CreatePlaylistRequest, PlaylistDto, PopulatedPlaylistDto, UpdatePlaylistRequest};

const DUPLICATE_NAME: &str = "You already have a playlist with this name";

/// Shared state for Playlist API endpoints
#[derive(Clone)]
pub struct PlaylistsApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Playlist API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = PlaylistsApiState { database };

    Router::new()
        .route("/", post(create_playlist))
        .route("/user/{userId}", get(list_user_playlists))
        .route(
            "/{playlistId}",
            get(get_playlist).patch(update_playlist).delete(delete_playlist),
        )
        .route(
            "/{playlistId}/videos/{videoId}",
            patch(add_video).delete(remove_video),
        )
        .with_state(state)
}

/// Unique (owner, name) rejections carry the playlist message
fn name_conflict(e: impl Into<DomainError>) -> ApiError {
    match e.into() {
        DomainError::Conflict(_) => ApiError::conflict(DUPLICATE_NAME),
        other => other.into(),
    }
}

async fn owned_playlist(
    state: &PlaylistsApiState,
    caller_id: &str,
    playlist_id: &str,
    action: &str,
) -> Result<PlaylistRow, ApiError> {
    let playlist = state.database.repository().get_playlist(playlist_id).await?;
    Ok(require_owner(caller_id, playlist, action)?)
}

#[utoipa::path(
    post,
    path = "/api/v1/playlists",
    tag = "playlists",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = PlaylistDto),
        (status = 400, description = "Name and description are required", body = crate::api::types::ErrorBody),
        (status = 409, description = "Duplicate playlist name", body = crate::api::types::ErrorBody)
    )
)]
pub async fn create_playlist(
    State(state): State<PlaylistsApiState>,
    Auth(caller): Auth,
    ValidatedJson(req): ValidatedJson<CreatePlaylistRequest>,
) -> Result<ApiResponse<PlaylistDto>, ApiError> {
    let playlist = state
        .database
        .repository()
        .create_playlist(caller.user_id(), req.name.trim(), &req.description)
        .await
        .map_err(name_conflict)?;

    Ok(ApiResponse::created(
        PlaylistDto::from(playlist),
        "Playlist created successfully",
    ))
}

/// A user's playlists with videos populated
#[utoipa::path(
    get,
    path = "/api/v1/playlists/user/{userId}",
    tag = "playlists",
    params(("userId" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Playlists", body = Vec<PopulatedPlaylistDto>),
        (status = 400, description = "Invalid user ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_user_playlists(
    State(state): State<PlaylistsApiState>,
    user_id: PathId<UserIdParam>,
) -> Result<ApiResponse<Vec<PopulatedPlaylistDto>>, ApiError> {
    let playlists = user_playlists(state.database.repository().as_ref(), &user_id).await?;

    Ok(ApiResponse::ok(
        playlists.into_iter().map(PopulatedPlaylistDto::from).collect(),
        "User Playlist fetched",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/playlists/{playlistId}",
    tag = "playlists",
    params(("playlistId" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Playlist", body = PlaylistDto),
        (status = 404, description = "Playlist not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_playlist(
    State(state): State<PlaylistsApiState>,
    playlist_id: PathId<PlaylistIdParam>,
) -> Result<ApiResponse<PlaylistDto>, ApiError> {
    let playlist = state
        .database
        .repository()
        .get_playlist(&playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;

    Ok(ApiResponse::ok(
        PlaylistDto::from(playlist),
        "Playlist fetched successfully",
    ))
}

/// Rename and/or re-describe; absent or empty fields are left alone
#[utoipa::path(
    patch,
    path = "/api/v1/playlists/{playlistId}",
    tag = "playlists",
    params(("playlistId" = String, Path, description = "Playlist ID")),
    request_body = UpdatePlaylistRequest,
    responses(
        (status = 200, description = "Playlist updated", body = PlaylistDto),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Playlist not found", body = crate::api::types::ErrorBody),
        (status = 409, description = "Duplicate playlist name", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_playlist(
    State(state): State<PlaylistsApiState>,
    Auth(caller): Auth,
    playlist_id: PathId<PlaylistIdParam>,
    ValidatedJson(req): ValidatedJson<UpdatePlaylistRequest>,
) -> Result<ApiResponse<PlaylistDto>, ApiError> {
    let existing = owned_playlist(&state, caller.user_id(), &playlist_id, "update").await?;

    let playlist = if req.name().is_none() && req.description().is_none() {
        existing
    } else {
        state
            .database
            .repository()
            .update_playlist(&playlist_id, req.name(), req.description())
            .await
            .map_err(name_conflict)?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))?
    };

    Ok(ApiResponse::ok(
        PlaylistDto::from(playlist),
        "Playlist updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlistId}",
    tag = "playlists",
    params(("playlistId" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Deleted playlist", body = PlaylistDto),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Playlist not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn delete_playlist(
    State(state): State<PlaylistsApiState>,
    Auth(caller): Auth,
    playlist_id: PathId<PlaylistIdParam>,
) -> Result<ApiResponse<PlaylistDto>, ApiError> {
    let playlist = owned_playlist(&state, caller.user_id(), &playlist_id, "delete").await?;

    if !state.database.repository().delete_playlist(&playlist.id).await? {
        return Err(ApiError::not_found("Playlist not found"));
    }

    Ok(ApiResponse::ok(
        PlaylistDto::from(playlist),
        "Playlist deleted successfully",
    ))
}

/// Append a video to the end of the playlist
#[utoipa::path(
    patch,
    path = "/api/v1/playlists/{playlistId}/videos/{videoId}",
    tag = "playlists",
    params(
        ("playlistId" = String, Path, description = "Playlist ID"),
        ("videoId" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video added", body = PlaylistDto),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Playlist not found", body = crate::api::types::ErrorBody),
        (status = 409, description = "Video already in playlist", body = crate::api::types::ErrorBody)
    )
)]
pub async fn add_video(
    State(state): State<PlaylistsApiState>,
    Auth(caller): Auth,
    path: PlaylistVideoPath,
) -> Result<ApiResponse<PlaylistDto>, ApiError> {
    owned_playlist(&state, caller.user_id(), &path.playlist_id, "modify").await?;

    let repo = state.database.repository();
    if !repo.add_playlist_video(&path.playlist_id, &path.video_id).await? {
        return Err(ApiError::conflict("Video already in playlist"));
    }

    let playlist = repo
        .get_playlist(&path.playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;

    Ok(ApiResponse::ok(
        PlaylistDto::from(playlist),
        "Video added to playlist",
    ))
}

/// Remove a video; removing one that is not present is a no-op
#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlistId}/videos/{videoId}",
    tag = "playlists",
    params(
        ("playlistId" = String, Path, description = "Playlist ID"),
        ("videoId" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video removed", body = PlaylistDto),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Playlist not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn remove_video(
    State(state): State<PlaylistsApiState>,
    Auth(caller): Auth,
    path: PlaylistVideoPath,
) -> Result<ApiResponse<PlaylistDto>, ApiError> {
    owned_playlist(&state, caller.user_id(), &path.playlist_id, "modify").await?;

    let repo = state.database.repository();
    let removed = repo
        .remove_playlist_video(&path.playlist_id, &path.video_id)
        .await?;
    tracing::trace!(playlist_id = %path.playlist_id, video_id = %path.video_id, removed, "Playlist video removal");

    let playlist = repo
        .get_playlist(&path.playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;

    Ok(ApiResponse::ok(
        PlaylistDto::from(playlist),
        "Video removed from playlist",
    ))
}
