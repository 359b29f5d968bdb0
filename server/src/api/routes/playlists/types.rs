//! Playlist API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::routes::types::VideoDto;
use crate::api::types::timestamp;
use crate::data::types::PlaylistRow;
use crate::domain::views::PlaylistWithVideos;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_playlist"))]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn validate_create_playlist(req: &CreatePlaylistRequest) -> Result<(), ValidationError> {
    if req.name.trim().is_empty() || req.description.is_empty() {
        return Err(ValidationError::new("required")
            .with_message("Name and description are required".into()));
    }
    Ok(())
}

/// Only non-empty fields are applied
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdatePlaylistRequest {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Playlist fields shared by both shapes
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistFields {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistFields {
    fn split(row: PlaylistRow) -> (Self, Vec<String>) {
        let fields = Self {
            id: row.id,
            name: row.name,
            description: row.description,
            owner: row.owner_id,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        };
        (fields, row.video_ids)
    }
}

/// Playlist with its videos as ids, in stored order
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistDto {
    #[serde(flatten)]
    pub fields: PlaylistFields,
    pub videos: Vec<String>,
}

impl From<PlaylistRow> for PlaylistDto {
    fn from(row: PlaylistRow) -> Self {
        let (fields, videos) = PlaylistFields::split(row);
        Self { fields, videos }
    }
}

/// Playlist with its videos populated
#[derive(Debug, Serialize, ToSchema)]
pub struct PopulatedPlaylistDto {
    #[serde(flatten)]
    pub fields: PlaylistFields,
    pub videos: Vec<VideoDto>,
}

impl From<PlaylistWithVideos> for PopulatedPlaylistDto {
    fn from(entry: PlaylistWithVideos) -> Self {
        Self {
            fields: PlaylistFields::split(entry.playlist).0,
            videos: entry.videos.into_iter().map(VideoDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_ignores_empty_fields() {
        let req = UpdatePlaylistRequest {
            name: Some("  ".to_string()),
            description: Some("new".to_string()),
        };
        assert_eq!(req.name(), None);
        assert_eq!(req.description(), Some("new"));
    }

    #[test]
    fn test_create_requires_both() {
        let req = CreatePlaylistRequest {
            name: "Mix".to_string(),
            description: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_playlist_dto_keeps_video_order() {
        let dto = PlaylistDto::from(PlaylistRow {
            id: "p1".to_string(),
            owner_id: "u1".to_string(),
            name: "Mix".to_string(),
            description: "d".to_string(),
            video_ids: vec!["b".to_string(), "a".to_string()],
            created_at: 0,
            updated_at: 0,
        });
        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["_id"], "p1");
        assert_eq!(json["videos"], serde_json::json!(["b", "a"]));
    }
}
