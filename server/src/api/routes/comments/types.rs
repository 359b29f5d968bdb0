//! Comment API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::not_blank;
use crate::api::types::timestamp;
use crate::data::types::{CommentRow, CommentWithOwner};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCommentRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Content and videoId are required"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Updated content is required"))]
    pub content: String,
}

/// Stored comment with refs as ids
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub video: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentDto {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            video: row.video_id,
            owner: row.owner_id,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

/// Comment author; every field is null when the author no longer resolves
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct CommentOwnerDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

/// Entry of the comment list
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentListItemDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: CommentOwnerDto,
}

impl From<CommentWithOwner> for CommentListItemDto {
    fn from(row: CommentWithOwner) -> Self {
        let owner = row
            .owner
            .map(|user| CommentOwnerDto {
                id: Some(user.id),
                username: Some(user.username),
                avatar: Some(user.avatar),
            })
            .unwrap_or_default();
        Self {
            id: row.comment.id,
            content: row.comment.content,
            created_at: timestamp(row.comment.created_at),
            updated_at: timestamp(row.comment.updated_at),
            owner,
        }
    }
}
