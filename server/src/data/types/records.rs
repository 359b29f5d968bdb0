//! Stored record types
//!
//! Timestamps are Unix milliseconds.

// ============================================================================
// User types
// ============================================================================

/// User row from database
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub password_hash: String,
    pub refresh_token_hash: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public subset of a user, used when another record is joined to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
}

impl From<&UserRow> for UserSummary {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

// ============================================================================
// Video types
// ============================================================================

/// Video row from database
#[derive(Debug, Clone)]
pub struct VideoRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: i64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Video joined to its owner. `owner` is `None` when the owner no longer resolves.
#[derive(Debug, Clone)]
pub struct VideoWithOwner {
    pub video: VideoRow,
    pub owner: Option<UserSummary>,
}

// ============================================================================
// Comment and tweet types
// ============================================================================

/// Comment row from database
#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: String,
    pub video_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Comment joined to its owner (left join)
#[derive(Debug, Clone)]
pub struct CommentWithOwner {
    pub comment: CommentRow,
    pub owner: Option<UserSummary>,
}

/// Tweet row from database
#[derive(Debug, Clone)]
pub struct TweetRow {
    pub id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Tweet joined to its owner (left join)
#[derive(Debug, Clone)]
pub struct TweetWithOwner {
    pub tweet: TweetRow,
    pub owner: Option<UserSummary>,
}

// ============================================================================
// Toggle relation types
// ============================================================================

/// The single record a like points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeTarget {
    Video(String),
    Comment(String),
    Tweet(String),
}

impl LikeTarget {
    /// Column holding this target's id in the `likes` table
    pub const fn column(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video_id",
            LikeTarget::Comment(_) => "comment_id",
            LikeTarget::Tweet(_) => "tweet_id",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => id,
        }
    }
}

/// Like row from database
#[derive(Debug, Clone)]
pub struct LikeRow {
    pub id: String,
    pub liked_by: String,
    pub target: LikeTarget,
    pub created_at: i64,
}

/// A video like with the video resolved (`None` if the video was deleted)
#[derive(Debug, Clone)]
pub struct LikedVideoRow {
    pub like: LikeRow,
    pub video: Option<VideoRow>,
}

/// Subscription row from database
#[derive(Debug, Clone)]
pub struct SubscriptionRow {
    pub id: String,
    pub subscriber_id: String,
    pub channel_id: String,
    pub created_at: i64,
}

/// Subscription with the other side of the relation resolved
#[derive(Debug, Clone)]
pub struct SubscriptionWithUser {
    pub subscription: SubscriptionRow,
    pub user: Option<UserSummary>,
}

// ============================================================================
// Playlist types
// ============================================================================

/// Playlist row with its ordered video ids
#[derive(Debug, Clone)]
pub struct PlaylistRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub video_ids: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
