//! Response shapes shared across route groups
//!
//! Records serialize with `_id` and camelCase keys. Timestamps are RFC 3339.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::timestamp;
use crate::data::types::{UserRow, UserSummary, VideoRow};

// ============================================================================
// Users
// ============================================================================

/// User record without credentials
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            full_name: row.full_name,
            avatar: row.avatar,
            cover_image: row.cover_image,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

/// `{_id, username, avatar}`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploaderDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub avatar: String,
}

impl From<UserSummary> for UploaderDto {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar: user.avatar,
        }
    }
}

/// `{_id, username, fullName, avatar}`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

impl From<UserSummary> for AuthorDto {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            avatar: user.avatar,
        }
    }
}

// ============================================================================
// Videos
// ============================================================================

/// Video fields common to every video shape
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoFields {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub video_file: String,
    pub thumbnail: String,
    /// Seconds
    pub duration: i64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoFields {
    fn split(row: VideoRow) -> (Self, String) {
        let fields = Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            video_file: row.video_file,
            thumbnail: row.thumbnail,
            duration: row.duration,
            views: row.views,
            is_published: row.is_published,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        };
        (fields, row.owner_id)
    }
}

/// Video record with its owner as an id
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoDto {
    #[serde(flatten)]
    pub fields: VideoFields,
    pub owner: String,
}

impl From<VideoRow> for VideoDto {
    fn from(row: VideoRow) -> Self {
        let (fields, owner) = VideoFields::split(row);
        Self { fields, owner }
    }
}

/// Video with its owner populated as `{_id, username, avatar}`
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoWithOwnerDto {
    #[serde(flatten)]
    pub fields: VideoFields,
    pub owner: Option<UploaderDto>,
}

impl VideoWithOwnerDto {
    pub fn new(video: VideoRow, owner: Option<UserSummary>) -> Self {
        Self {
            fields: VideoFields::split(video).0,
            owner: owner.map(UploaderDto::from),
        }
    }
}

/// Feed entry: owner projected as `uploader`
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedVideoDto {
    #[serde(flatten)]
    pub fields: VideoFields,
    pub uploader: Option<UploaderDto>,
}

impl FeedVideoDto {
    pub fn new(video: VideoRow, owner: Option<UserSummary>) -> Self {
        Self {
            fields: VideoFields::split(video).0,
            uploader: owner.map(UploaderDto::from),
        }
    }
}

/// Watch-history entry: owner collapsed to `{_id, fullName, username, avatar}` or null
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryVideoDto {
    #[serde(flatten)]
    pub fields: VideoFields,
    pub owner: Option<AuthorDto>,
}

impl HistoryVideoDto {
    pub fn new(video: VideoRow, owner: Option<UserSummary>) -> Self {
        Self {
            fields: VideoFields::split(video).0,
            owner: owner.map(AuthorDto::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoRow {
        VideoRow {
            id: "v1".to_string(),
            owner_id: "u1".to_string(),
            title: "Title".to_string(),
            description: "Desc".to_string(),
            category: "music".to_string(),
            video_file: "http://x/media/videos/a.mp4".to_string(),
            thumbnail: "http://x/media/thumbnails/a.png".to_string(),
            duration: 12,
            views: 3,
            is_published: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn summary() -> UserSummary {
        UserSummary {
            id: "u1".to_string(),
            username: "alice".to_string(),
            full_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            avatar: "http://x/a.png".to_string(),
        }
    }

    #[test]
    fn test_video_dto_shape() {
        let json = serde_json::to_value(VideoDto::from(video())).unwrap();
        assert_eq!(json["_id"], "v1");
        assert_eq!(json["owner"], "u1");
        assert_eq!(json["videoFile"], "http://x/media/videos/a.mp4");
        assert_eq!(json["isPublished"], true);
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_feed_uploader_projection() {
        let json = serde_json::to_value(FeedVideoDto::new(video(), Some(summary()))).unwrap();
        assert_eq!(json["uploader"]["_id"], "u1");
        assert_eq!(json["uploader"]["username"], "alice");
        assert!(json["uploader"].get("email").is_none());
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn test_history_owner_null_when_unresolved() {
        let json = serde_json::to_value(HistoryVideoDto::new(video(), None)).unwrap();
        assert!(json["owner"].is_null());

        let json = serde_json::to_value(HistoryVideoDto::new(video(), Some(summary()))).unwrap();
        assert_eq!(json["owner"]["fullName"], "Alice");
    }
}
