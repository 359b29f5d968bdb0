//! Subscription API endpoints

pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};

use crate::api::auth::Auth;
use crate::api::extractors::{ChannelIdParam, PathId, SubscriberIdParam};
use crate::api::types::{ApiError, ApiResponse};
use crate::data::TransactionalService;
use crate::domain::{Toggled, toggle_subscription};

use types::{ChannelEntryDto, SubscriberEntryDto};

/// Shared state for Subscription API endpoints
#[derive(Clone)]
pub struct SubscriptionsApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Subscription API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = SubscriptionsApiState { database };

    Router::new()
        .route("/c/{channelId}", post(toggle_channel_subscription))
        .route("/c/{channelId}/subscribers", get(list_channel_subscribers))
        .route(
            "/u/{subscriberId}/subscriptions",
            get(list_subscribed_channels),
        )
        .with_state(state)
}

/// Subscribe to, or unsubscribe from, a channel
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/c/{channelId}",
    tag = "subscriptions",
    params(("channelId" = String, Path, description = "Channel (user) ID")),
    responses(
        (status = 201, description = "Subscribed successfully"),
        (status = 200, description = "Unsubscribed successfully"),
        (status = 400, description = "Invalid channel ID or self-subscription", body = crate::api::types::ErrorBody),
        (status = 404, description = "Channel Not Found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn toggle_channel_subscription(
    State(state): State<SubscriptionsApiState>,
    Auth(caller): Auth,
    channel_id: PathId<ChannelIdParam>,
) -> Result<ApiResponse<()>, ApiError> {
    let outcome = toggle_subscription(
        state.database.repository().as_ref(),
        caller.user_id(),
        &channel_id,
    )
    .await?;

    Ok(match outcome {
        Toggled::Created(_) => ApiResponse::created((), "Subscribed successfully"),
        Toggled::Deleted => ApiResponse::ok((), "Unsubscribed successfully"),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/c/{channelId}/subscribers",
    tag = "subscriptions",
    params(("channelId" = String, Path, description = "Channel (user) ID")),
    responses(
        (status = 200, description = "List of subscribers", body = Vec<SubscriberEntryDto>),
        (status = 400, description = "Invalid channel ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_channel_subscribers(
    State(state): State<SubscriptionsApiState>,
    Auth(_caller): Auth,
    channel_id: PathId<ChannelIdParam>,
) -> Result<ApiResponse<Vec<SubscriberEntryDto>>, ApiError> {
    let subscribers = state
        .database
        .repository()
        .list_channel_subscribers(&channel_id)
        .await?;

    Ok(ApiResponse::ok(
        subscribers.into_iter().map(SubscriberEntryDto::from).collect(),
        "List of subscribers",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/u/{subscriberId}/subscriptions",
    tag = "subscriptions",
    params(("subscriberId" = String, Path, description = "Subscriber (user) ID")),
    responses(
        (status = 200, description = "List of subscribed channels", body = Vec<ChannelEntryDto>),
        (status = 400, description = "Invalid subscriber ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_subscribed_channels(
    State(state): State<SubscriptionsApiState>,
    Auth(_caller): Auth,
    subscriber_id: PathId<SubscriberIdParam>,
) -> Result<ApiResponse<Vec<ChannelEntryDto>>, ApiError> {
    let channels = state
        .database
        .repository()
        .list_subscribed_channels(&subscriber_id)
        .await?;

    Ok(ApiResponse::ok(
        channels.into_iter().map(ChannelEntryDto::from).collect(),
        "List of subscribed channels",
    ))
}
