//! Channel dashboard for the signed-in user

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::auth::Auth;
use crate::api::routes::types::VideoWithOwnerDto;
use crate::api::types::{ApiError, ApiResponse};
use crate::data::TransactionalService;
use crate::domain::views::{ChannelStats, channel_stats, owner_videos};

/// Shared state for Dashboard API endpoints
#[derive(Clone)]
pub struct DashboardApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Dashboard API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    Router::new()
        .route("/stats", get(get_channel_stats))
        .route("/videos", get(get_channel_videos))
        .with_state(DashboardApiState { database })
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatsDto {
    pub total_videos: u64,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_subscribers: u64,
}

impl From<ChannelStats> for ChannelStatsDto {
    fn from(stats: ChannelStats) -> Self {
        Self {
            total_videos: stats.total_videos,
            total_views: stats.total_views,
            total_likes: stats.total_likes,
            total_subscribers: stats.total_subscribers,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "dashboard",
    responses(
        (status = 200, description = "Channel totals", body = ChannelStatsDto),
        (status = 401, description = "Not signed in", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_channel_stats(
    State(state): State<DashboardApiState>,
    Auth(caller): Auth,
) -> Result<ApiResponse<ChannelStatsDto>, ApiError> {
    let stats = channel_stats(state.database.repository().as_ref(), caller.user_id()).await?;
    Ok(ApiResponse::ok(
        ChannelStatsDto::from(stats),
        "Channel statistics fetched successfully",
    ))
}

/// The caller's uploads, newest first, published or not
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/videos",
    tag = "dashboard",
    responses(
        (status = 200, description = "Channel videos", body = Vec<VideoWithOwnerDto>),
        (status = 401, description = "Not signed in", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_channel_videos(
    State(state): State<DashboardApiState>,
    Auth(caller): Auth,
) -> Result<ApiResponse<Vec<VideoWithOwnerDto>>, ApiError> {
    let videos = owner_videos(state.database.repository().as_ref(), caller.user_id()).await?;
    Ok(ApiResponse::ok(
        videos
            .into_iter()
            .map(|row| VideoWithOwnerDto::new(row.video, row.owner))
            .collect(),
        "Channel videos fetched successfully",
    ))
}
