//! Like API types

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::routes::types::VideoDto;
use crate::api::types::timestamp;
use crate::data::types::{LikeRow, LikeTarget, LikedVideoRow};

/// A like; exactly one of `video`, `comment` and `tweet` is set
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub liked_by: String,
    pub video: Option<String>,
    pub comment: Option<String>,
    pub tweet: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LikeRow> for LikeDto {
    fn from(row: LikeRow) -> Self {
        let (video, comment, tweet) = match row.target {
            LikeTarget::Video(id) => (Some(id), None, None),
            LikeTarget::Comment(id) => (None, Some(id), None),
            LikeTarget::Tweet(id) => (None, None, Some(id)),
        };
        Self {
            id: row.id,
            liked_by: row.liked_by,
            video,
            comment,
            tweet,
            created_at: timestamp(row.created_at),
        }
    }
}

/// A video like with the video populated; `video` is null once deleted
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideoDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub liked_by: String,
    pub video: Option<VideoDto>,
    pub created_at: DateTime<Utc>,
}

impl From<LikedVideoRow> for LikedVideoDto {
    fn from(row: LikedVideoRow) -> Self {
        Self {
            id: row.like.id,
            liked_by: row.like.liked_by,
            video: row.video.map(VideoDto::from),
            created_at: timestamp(row.like.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_target_ref_is_set() {
        let dto = LikeDto::from(LikeRow {
            id: "l1".to_string(),
            liked_by: "u1".to_string(),
            target: LikeTarget::Comment("c1".to_string()),
            created_at: 0,
        });
        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["likedBy"], "u1");
        assert_eq!(json["comment"], "c1");
        assert!(json["video"].is_null());
        assert!(json["tweet"].is_null());
    }
}
