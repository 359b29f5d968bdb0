//! Tweet API endpoints

pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};

use crate::api::auth::Auth;
use crate::api::extractors::{PathId, TweetIdParam, UserIdParam, ValidatedJson};
use crate::api::types::{ApiError, ApiResponse};
use crate::data::TransactionalService;
use crate::domain::require_owner;
use crate::utils::id::is_valid_id;

use types::{CreateTweetRequest, TweetDto, UpdateTweetRequest, UserTweetDto};

/// Shared state for Tweet API endpoints
#[derive(Clone)]
pub struct TweetsApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Tweet API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = TweetsApiState { database };

    Router::new()
        .route("/", post(create_tweet))
        .route("/user/{userId}", get(list_user_tweets))
        .route("/{tweetId}", patch(update_tweet).delete(delete_tweet))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/tweets",
    tag = "tweets",
    request_body = CreateTweetRequest,
    responses(
        (status = 201, description = "Tweet created", body = TweetDto),
        (status = 400, description = "Tweet content is empty", body = crate::api::types::ErrorBody)
    )
)]
pub async fn create_tweet(
    State(state): State<TweetsApiState>,
    Auth(caller): Auth,
    ValidatedJson(req): ValidatedJson<CreateTweetRequest>,
) -> Result<ApiResponse<TweetDto>, ApiError> {
    let tweet = state
        .database
        .repository()
        .create_tweet(caller.user_id(), &req.content)
        .await?;

    Ok(ApiResponse::created(
        TweetDto::from(tweet),
        "Tweet created successfully",
    ))
}

/// A user's tweets, newest first
#[utoipa::path(
    get,
    path = "/api/v1/tweets/user/{userId}",
    tag = "tweets",
    params(("userId" = String, Path, description = "Author user ID")),
    responses(
        (status = 200, description = "Tweets with author", body = Vec<UserTweetDto>),
        (status = 400, description = "Invalid user ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn list_user_tweets(
    State(state): State<TweetsApiState>,
    user_id: PathId<UserIdParam>,
) -> Result<ApiResponse<Vec<UserTweetDto>>, ApiError> {
    let tweets = state
        .database
        .repository()
        .list_tweets_by_owner(&user_id)
        .await?;

    Ok(ApiResponse::ok(
        tweets.into_iter().map(UserTweetDto::from).collect(),
        "User tweets fetched",
    ))
}

/// Replace a tweet's content (trimmed)
#[utoipa::path(
    patch,
    path = "/api/v1/tweets/{tweetId}",
    tag = "tweets",
    params(("tweetId" = String, Path, description = "Tweet ID")),
    request_body = UpdateTweetRequest,
    responses(
        (status = 200, description = "Tweet updated", body = TweetDto),
        (status = 400, description = "Missing or blank content, or invalid id", body = crate::api::types::ErrorBody),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Tweet not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_tweet(
    State(state): State<TweetsApiState>,
    Auth(caller): Auth,
    Path(tweet_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTweetRequest>,
) -> Result<ApiResponse<TweetDto>, ApiError> {
    if !is_valid_id(&tweet_id) {
        return Err(ApiError::bad_request("Invalid Tweet ID"));
    }

    let repo = state.database.repository();
    require_owner(caller.user_id(), repo.get_tweet(&tweet_id).await?, "update")?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::bad_request("Tweet content cannot be empty"));
    }

    let tweet = repo
        .update_tweet(&tweet_id, content)
        .await?
        .ok_or_else(|| ApiError::not_found("Tweet not found"))?;

    Ok(ApiResponse::ok(
        TweetDto::from(tweet),
        "Tweet updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tweets/{tweetId}",
    tag = "tweets",
    params(("tweetId" = String, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Tweet deleted"),
        (status = 403, description = "Not the owner", body = crate::api::types::ErrorBody),
        (status = 404, description = "Tweet not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn delete_tweet(
    State(state): State<TweetsApiState>,
    Auth(caller): Auth,
    tweet_id: PathId<TweetIdParam>,
) -> Result<ApiResponse<()>, ApiError> {
    let repo = state.database.repository();
    let tweet = require_owner(caller.user_id(), repo.get_tweet(&tweet_id).await?, "delete")?;

    repo.delete_tweet(&tweet.id).await?;
    Ok(ApiResponse::ok((), "Tweet deleted successfully"))
}
