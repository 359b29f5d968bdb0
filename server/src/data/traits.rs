//! Repository trait for the storage backend
//!
//! Handlers and domain services depend on `TransactionalRepository` only, so the
//! SQLite implementation stays behind this seam.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    CommentRow, CommentWithOwner, LikeRow, LikeTarget, LikedVideoRow, NewUser, NewVideo,
    PlaylistRow, SubscriptionRow, SubscriptionWithUser, TweetRow, TweetWithOwner, UserRow,
    UserSummary, VideoFeedFilter, VideoPatch, VideoRow, VideoSort, VideoWithOwner,
};

/// Repository trait for all record operations
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    // ==================== User Operations ====================

    /// Create a user. Taken username or email yields `DataError::Conflict`.
    async fn create_user(&self, new: &NewUser) -> Result<UserRow, DataError>;

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    /// Match on username OR email; `None` arguments never match
    async fn find_user_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserRow>, DataError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DataError>;

    /// Batch lookup of public user fields; unknown ids are skipped
    async fn get_user_summaries(&self, ids: &[String]) -> Result<Vec<UserSummary>, DataError>;

    async fn update_user_account(
        &self,
        id: &str,
        full_name: &str,
        username: &str,
        email: &str,
    ) -> Result<Option<UserRow>, DataError>;

    async fn update_user_avatar(&self, id: &str, url: &str)
    -> Result<Option<UserRow>, DataError>;

    async fn update_user_cover_image(
        &self,
        id: &str,
        url: &str,
    ) -> Result<Option<UserRow>, DataError>;

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool, DataError>;

    async fn set_refresh_token_hash(
        &self,
        id: &str,
        hash: Option<&str>,
    ) -> Result<bool, DataError>;

    /// Append to watch history unless already present
    async fn append_watch_history(&self, user_id: &str, video_id: &str)
    -> Result<bool, DataError>;

    /// Watch history video ids in stored order
    async fn get_watch_history_ids(&self, user_id: &str) -> Result<Vec<String>, DataError>;

    // ==================== Video Operations ====================

    async fn create_video(&self, new: &NewVideo) -> Result<VideoRow, DataError>;

    async fn get_video(&self, id: &str) -> Result<Option<VideoRow>, DataError>;

    /// Video inner-joined to its owner
    async fn get_video_with_owner(&self, id: &str) -> Result<Option<VideoWithOwner>, DataError>;

    async fn get_videos_by_ids(&self, ids: &[String]) -> Result<Vec<VideoRow>, DataError>;

    async fn update_video(
        &self,
        id: &str,
        patch: &VideoPatch,
    ) -> Result<Option<VideoRow>, DataError>;

    async fn set_video_published(&self, id: &str, is_published: bool)
    -> Result<bool, DataError>;

    async fn delete_video(&self, id: &str) -> Result<bool, DataError>;

    async fn increment_video_views(&self, id: &str) -> Result<bool, DataError>;

    /// Count feed matches (uploader must resolve)
    async fn count_video_feed(&self, filter: &VideoFeedFilter) -> Result<u64, DataError>;

    /// One window of the feed under the same filter as `count_video_feed`
    async fn list_video_feed(
        &self,
        filter: &VideoFeedFilter,
        sort: VideoSort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<VideoWithOwner>, DataError>;

    async fn list_videos_by_owner(&self, owner_id: &str) -> Result<Vec<VideoRow>, DataError>;

    async fn count_videos_by_owner(&self, owner_id: &str) -> Result<u64, DataError>;

    async fn sum_video_views_by_owner(&self, owner_id: &str) -> Result<u64, DataError>;

    // ==================== Comment Operations ====================

    async fn create_comment(
        &self,
        video_id: &str,
        owner_id: &str,
        content: &str,
    ) -> Result<CommentRow, DataError>;

    async fn get_comment(&self, id: &str) -> Result<Option<CommentRow>, DataError>;

    async fn update_comment(&self, id: &str, content: &str)
    -> Result<Option<CommentRow>, DataError>;

    async fn delete_comment(&self, id: &str) -> Result<bool, DataError>;

    async fn count_comments_for_video(&self, video_id: &str) -> Result<u64, DataError>;

    /// One window of a video's comments, newest first, owner left-joined
    async fn list_comments_for_video(
        &self,
        video_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<CommentWithOwner>, DataError>;

    // ==================== Tweet Operations ====================

    async fn create_tweet(&self, owner_id: &str, content: &str) -> Result<TweetRow, DataError>;

    async fn get_tweet(&self, id: &str) -> Result<Option<TweetRow>, DataError>;

    async fn update_tweet(&self, id: &str, content: &str) -> Result<Option<TweetRow>, DataError>;

    async fn delete_tweet(&self, id: &str) -> Result<bool, DataError>;

    async fn list_tweets_by_owner(&self, owner_id: &str)
    -> Result<Vec<TweetWithOwner>, DataError>;

    // ==================== Like Operations ====================

    /// Returns true if a like was removed
    async fn delete_like(&self, liked_by: &str, target: &LikeTarget) -> Result<bool, DataError>;

    /// Returns `None` if the like already exists
    async fn insert_like(
        &self,
        liked_by: &str,
        target: &LikeTarget,
    ) -> Result<Option<LikeRow>, DataError>;

    async fn count_likes_by_user(&self, liked_by: &str) -> Result<u64, DataError>;

    async fn list_liked_videos(&self, liked_by: &str) -> Result<Vec<LikedVideoRow>, DataError>;

    // ==================== Subscription Operations ====================

    /// Returns true if a subscription was removed
    async fn delete_subscription(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> Result<bool, DataError>;

    /// Returns `None` if the subscription already exists
    async fn insert_subscription(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> Result<Option<SubscriptionRow>, DataError>;

    async fn is_subscribed(&self, subscriber_id: &str, channel_id: &str)
    -> Result<bool, DataError>;

    async fn count_subscribers(&self, channel_id: &str) -> Result<u64, DataError>;

    async fn count_subscriptions(&self, subscriber_id: &str) -> Result<u64, DataError>;

    async fn list_channel_subscribers(
        &self,
        channel_id: &str,
    ) -> Result<Vec<SubscriptionWithUser>, DataError>;

    async fn list_subscribed_channels(
        &self,
        subscriber_id: &str,
    ) -> Result<Vec<SubscriptionWithUser>, DataError>;

    // ==================== Playlist Operations ====================

    /// Create a playlist. A duplicate (owner, name) yields `DataError::Conflict`.
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRow, DataError>;

    async fn get_playlist(&self, id: &str) -> Result<Option<PlaylistRow>, DataError>;

    async fn list_playlists_by_owner(&self, owner_id: &str)
    -> Result<Vec<PlaylistRow>, DataError>;

    async fn update_playlist(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<PlaylistRow>, DataError>;

    async fn delete_playlist(&self, id: &str) -> Result<bool, DataError>;

    /// Returns false if the video is already in the playlist
    async fn add_playlist_video(&self, playlist_id: &str, video_id: &str)
    -> Result<bool, DataError>;

    /// Returns false if the video was not in the playlist
    async fn remove_playlist_video(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<bool, DataError>;
}
