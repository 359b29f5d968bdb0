//! TransactionalRepository implementation for SQLite
//!
//! Each method delegates to the matching repository function and lifts
//! `SqliteError` into `DataError`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{
    CommentRow, CommentWithOwner, LikeRow, LikeTarget, LikedVideoRow, NewUser, NewVideo,
    PlaylistRow, SubscriptionRow, SubscriptionWithUser, TweetRow, TweetWithOwner, UserRow,
    UserSummary, VideoFeedFilter, VideoPatch, VideoRow, VideoSort, VideoWithOwner,
};

use super::SqliteService;
use super::repositories::{comment, like, playlist, subscription, tweet, user, video};

/// SQLite binds integers as i64; larger values saturate so OFFSET never wraps negative
fn sql_bound(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl TransactionalRepository for Arc<SqliteService> {
    // ==================== User Operations ====================

    async fn create_user(&self, new: &NewUser) -> Result<UserRow, DataError> {
        user::create_user(self.pool(), new)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::get_user(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn find_user_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserRow>, DataError> {
        user::find_by_login(self.pool(), username, email)
            .await
            .map_err(Into::into)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DataError> {
        user::get_by_username(self.pool(), username)
            .await
            .map_err(Into::into)
    }

    async fn get_user_summaries(&self, ids: &[String]) -> Result<Vec<UserSummary>, DataError> {
        user::get_summaries(self.pool(), ids)
            .await
            .map_err(Into::into)
    }

    async fn update_user_account(
        &self,
        id: &str,
        full_name: &str,
        username: &str,
        email: &str,
    ) -> Result<Option<UserRow>, DataError> {
        user::update_account(self.pool(), id, full_name, username, email)
            .await
            .map_err(Into::into)
    }

    async fn update_user_avatar(&self, id: &str, url: &str) -> Result<Option<UserRow>, DataError> {
        user::update_avatar(self.pool(), id, url)
            .await
            .map_err(Into::into)
    }

    async fn update_user_cover_image(
        &self,
        id: &str,
        url: &str,
    ) -> Result<Option<UserRow>, DataError> {
        user::update_cover_image(self.pool(), id, url)
            .await
            .map_err(Into::into)
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool, DataError> {
        user::set_password_hash(self.pool(), id, password_hash)
            .await
            .map_err(Into::into)
    }

    async fn set_refresh_token_hash(
        &self,
        id: &str,
        hash: Option<&str>,
    ) -> Result<bool, DataError> {
        user::set_refresh_token_hash(self.pool(), id, hash)
            .await
            .map_err(Into::into)
    }

    async fn append_watch_history(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> Result<bool, DataError> {
        user::append_watch_history(self.pool(), user_id, video_id)
            .await
            .map_err(Into::into)
    }

    async fn get_watch_history_ids(&self, user_id: &str) -> Result<Vec<String>, DataError> {
        user::watch_history_ids(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Video Operations ====================

    async fn create_video(&self, new: &NewVideo) -> Result<VideoRow, DataError> {
        video::create_video(self.pool(), new)
            .await
            .map_err(Into::into)
    }

    async fn get_video(&self, id: &str) -> Result<Option<VideoRow>, DataError> {
        video::get_video(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn get_video_with_owner(&self, id: &str) -> Result<Option<VideoWithOwner>, DataError> {
        video::get_video_with_owner(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn get_videos_by_ids(&self, ids: &[String]) -> Result<Vec<VideoRow>, DataError> {
        video::get_videos_by_ids(self.pool(), ids)
            .await
            .map_err(Into::into)
    }

    async fn update_video(
        &self,
        id: &str,
        patch: &VideoPatch,
    ) -> Result<Option<VideoRow>, DataError> {
        video::update_video(self.pool(), id, patch)
            .await
            .map_err(Into::into)
    }

    async fn set_video_published(
        &self,
        id: &str,
        is_published: bool,
    ) -> Result<bool, DataError> {
        video::set_published(self.pool(), id, is_published)
            .await
            .map_err(Into::into)
    }

    async fn delete_video(&self, id: &str) -> Result<bool, DataError> {
        video::delete_video(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn increment_video_views(&self, id: &str) -> Result<bool, DataError> {
        video::increment_views(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn count_video_feed(&self, filter: &VideoFeedFilter) -> Result<u64, DataError> {
        video::count_feed(self.pool(), filter)
            .await
            .map_err(Into::into)
    }

    async fn list_video_feed(
        &self,
        filter: &VideoFeedFilter,
        sort: VideoSort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<VideoWithOwner>, DataError> {
        video::list_feed(self.pool(), filter, sort, sql_bound(offset), sql_bound(limit))
            .await
            .map_err(Into::into)
    }

    async fn list_videos_by_owner(&self, owner_id: &str) -> Result<Vec<VideoRow>, DataError> {
        video::list_by_owner(self.pool(), owner_id)
            .await
            .map_err(Into::into)
    }

    async fn count_videos_by_owner(&self, owner_id: &str) -> Result<u64, DataError> {
        video::count_by_owner(self.pool(), owner_id)
            .await
            .map_err(Into::into)
    }

    async fn sum_video_views_by_owner(&self, owner_id: &str) -> Result<u64, DataError> {
        video::sum_views_by_owner(self.pool(), owner_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Comment Operations ====================

    async fn create_comment(
        &self,
        video_id: &str,
        owner_id: &str,
        content: &str,
    ) -> Result<CommentRow, DataError> {
        comment::create_comment(self.pool(), video_id, owner_id, content)
            .await
            .map_err(Into::into)
    }

    async fn get_comment(&self, id: &str) -> Result<Option<CommentRow>, DataError> {
        comment::get_comment(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn update_comment(
        &self,
        id: &str,
        content: &str,
    ) -> Result<Option<CommentRow>, DataError> {
        comment::update_content(self.pool(), id, content)
            .await
            .map_err(Into::into)
    }

    async fn delete_comment(&self, id: &str) -> Result<bool, DataError> {
        comment::delete_comment(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn count_comments_for_video(&self, video_id: &str) -> Result<u64, DataError> {
        comment::count_for_video(self.pool(), video_id)
            .await
            .map_err(Into::into)
    }

    async fn list_comments_for_video(
        &self,
        video_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<CommentWithOwner>, DataError> {
        comment::list_for_video(self.pool(), video_id, sql_bound(offset), sql_bound(limit))
            .await
            .map_err(Into::into)
    }

    // ==================== Tweet Operations ====================

    async fn create_tweet(&self, owner_id: &str, content: &str) -> Result<TweetRow, DataError> {
        tweet::create_tweet(self.pool(), owner_id, content)
            .await
            .map_err(Into::into)
    }

    async fn get_tweet(&self, id: &str) -> Result<Option<TweetRow>, DataError> {
        tweet::get_tweet(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn update_tweet(&self, id: &str, content: &str) -> Result<Option<TweetRow>, DataError> {
        tweet::update_content(self.pool(), id, content)
            .await
            .map_err(Into::into)
    }

    async fn delete_tweet(&self, id: &str) -> Result<bool, DataError> {
        tweet::delete_tweet(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_tweets_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<TweetWithOwner>, DataError> {
        tweet::list_by_owner(self.pool(), owner_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Like Operations ====================

    async fn delete_like(&self, liked_by: &str, target: &LikeTarget) -> Result<bool, DataError> {
        like::delete_like(self.pool(), liked_by, target)
            .await
            .map_err(Into::into)
    }

    async fn insert_like(
        &self,
        liked_by: &str,
        target: &LikeTarget,
    ) -> Result<Option<LikeRow>, DataError> {
        like::insert_like(self.pool(), liked_by, target)
            .await
            .map_err(Into::into)
    }

    async fn count_likes_by_user(&self, liked_by: &str) -> Result<u64, DataError> {
        like::count_by_user(self.pool(), liked_by)
            .await
            .map_err(Into::into)
    }

    async fn list_liked_videos(&self, liked_by: &str) -> Result<Vec<LikedVideoRow>, DataError> {
        like::list_liked_videos(self.pool(), liked_by)
            .await
            .map_err(Into::into)
    }

    // ==================== Subscription Operations ====================

    async fn delete_subscription(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> Result<bool, DataError> {
        subscription::delete_subscription(self.pool(), subscriber_id, channel_id)
            .await
            .map_err(Into::into)
    }

    async fn insert_subscription(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> Result<Option<SubscriptionRow>, DataError> {
        subscription::insert_subscription(self.pool(), subscriber_id, channel_id)
            .await
            .map_err(Into::into)
    }

    async fn is_subscribed(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> Result<bool, DataError> {
        subscription::is_subscribed(self.pool(), subscriber_id, channel_id)
            .await
            .map_err(Into::into)
    }

    async fn count_subscribers(&self, channel_id: &str) -> Result<u64, DataError> {
        subscription::count_subscribers(self.pool(), channel_id)
            .await
            .map_err(Into::into)
    }

    async fn count_subscriptions(&self, subscriber_id: &str) -> Result<u64, DataError> {
        subscription::count_subscriptions(self.pool(), subscriber_id)
            .await
            .map_err(Into::into)
    }

    async fn list_channel_subscribers(
        &self,
        channel_id: &str,
    ) -> Result<Vec<SubscriptionWithUser>, DataError> {
        subscription::list_subscribers(self.pool(), channel_id)
            .await
            .map_err(Into::into)
    }

    async fn list_subscribed_channels(
        &self,
        subscriber_id: &str,
    ) -> Result<Vec<SubscriptionWithUser>, DataError> {
        subscription::list_subscribed_channels(self.pool(), subscriber_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Playlist Operations ====================

    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRow, DataError> {
        playlist::create_playlist(self.pool(), owner_id, name, description)
            .await
            .map_err(Into::into)
    }

    async fn get_playlist(&self, id: &str) -> Result<Option<PlaylistRow>, DataError> {
        playlist::get_playlist(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_playlists_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<PlaylistRow>, DataError> {
        playlist::list_by_owner(self.pool(), owner_id)
            .await
            .map_err(Into::into)
    }

    async fn update_playlist(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<PlaylistRow>, DataError> {
        playlist::update_playlist(self.pool(), id, name, description)
            .await
            .map_err(Into::into)
    }

    async fn delete_playlist(&self, id: &str) -> Result<bool, DataError> {
        playlist::delete_playlist(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn add_playlist_video(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<bool, DataError> {
        playlist::add_video(self.pool(), playlist_id, video_id)
            .await
            .map_err(Into::into)
    }

    async fn remove_playlist_video(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<bool, DataError> {
        playlist::remove_video(self.pool(), playlist_id, video_id)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::test_pool;

    #[test]
    fn test_sql_bound_saturates() {
        assert_eq!(sql_bound(20), 20);
        assert_eq!(sql_bound(i64::MAX as u64), i64::MAX);
        assert_eq!(sql_bound(u64::MAX), i64::MAX);
    }

    #[tokio::test]
    async fn test_comment_window_past_i64_is_empty() {
        let repo = Arc::new(SqliteService::from_pool(test_pool().await));
        for text in ["a", "b", "c"] {
            repo.create_comment("v1", "u1", text).await.unwrap();
        }

        let rows = repo
            .list_comments_for_video("v1", 9_999_999_999_999_999_990, 10)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
