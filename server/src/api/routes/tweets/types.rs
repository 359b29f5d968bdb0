//! Tweet API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::not_blank;
use crate::api::routes::types::AuthorDto;
use crate::api::types::timestamp;
use crate::data::types::{TweetRow, TweetWithOwner};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTweetRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Tweet content is empty"))]
    pub content: String,
}

/// Presence is checked up front; blankness only after the ownership check
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTweetRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Tweet content is required"))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TweetDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TweetRow> for TweetDto {
    fn from(row: TweetRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            owner: row.owner_id,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

/// Tweet with its author populated (null if the author is gone)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserTweetDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub owner: Option<AuthorDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TweetWithOwner> for UserTweetDto {
    fn from(row: TweetWithOwner) -> Self {
        Self {
            id: row.tweet.id,
            content: row.tweet.content,
            owner: row.owner.map(AuthorDto::from),
            created_at: timestamp(row.tweet.created_at),
            updated_at: timestamp(row.tweet.updated_at),
        }
    }
}
