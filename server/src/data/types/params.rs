//! Write inputs and read filters

/// Fields for a new user. Normalization (trim, lowercase) happens before this point.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub password_hash: String,
}

/// Fields for a new video
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: i64,
}

/// Partial video update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.thumbnail.is_none()
    }
}

/// Filter shared by the feed count and the feed page query
#[derive(Debug, Clone, Default)]
pub struct VideoFeedFilter {
    /// Case-insensitive substring of title or description
    pub query: Option<String>,
    pub owner_id: Option<String>,
    pub category: Option<String>,
    pub is_published: Option<bool>,
    pub min_views: Option<i64>,
    pub max_views: Option<i64>,
    pub min_duration: Option<i64>,
    pub max_duration: Option<i64>,
}

/// Sortable feed columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortField {
    pub const ALLOWED: &'static [&'static str] =
        &["createdAt", "updatedAt", "views", "duration", "title"];

    /// Parse an API sort key. Unknown keys return `None`.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            "views" => Some(Self::Views),
            "duration" => Some(Self::Duration),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    pub const fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "v.created_at",
            Self::UpdatedAt => "v.updated_at",
            Self::Views => "v.views",
            Self::Duration => "v.duration",
            Self::Title => "v.title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `asc` sorts ascending; anything else sorts descending
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoSort {
    pub field: VideoSortField,
    pub direction: SortDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_allowlist() {
        for key in VideoSortField::ALLOWED {
            assert!(VideoSortField::parse(key).is_some(), "{key}");
        }
        assert_eq!(VideoSortField::parse("owner"), None);
        assert_eq!(VideoSortField::parse("views; DROP TABLE videos"), None);
    }

    #[test]
    fn test_sort_direction_defaults_desc() {
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
    }

    #[test]
    fn test_video_patch_is_empty() {
        assert!(VideoPatch::default().is_empty());
        let patch = VideoPatch {
            category: Some("music".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
