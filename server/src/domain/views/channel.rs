//! Channel profile and channel statistics

use crate::data::TransactionalRepository;
use crate::data::types::UserRow;
use crate::domain::error::DomainError;
use crate::utils::id::is_valid_id;

/// A user seen as a channel, with subscription figures
#[derive(Debug, Clone)]
pub struct ChannelProfile {
    pub user: UserRow,
    pub subscriber_count: u64,
    pub channels_subscribed_to_count: u64,
    /// Whether the caller subscribes to this channel; false when anonymous
    pub is_subscribed: bool,
}

/// Channel profile by username, matched case-insensitively
pub async fn channel_profile(
    repo: &dyn TransactionalRepository,
    username: &str,
    caller_id: Option<&str>,
) -> Result<ChannelProfile, DomainError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DomainError::not_found("Username is missing"));
    }

    let user = repo
        .get_user_by_username(&username.to_lowercase())
        .await?
        .ok_or_else(|| DomainError::not_found("Channel does not exist"))?;

    let is_subscribed = async {
        match caller_id {
            Some(caller) => repo.is_subscribed(caller, &user.id).await,
            None => Ok(false),
        }
    };

    let (subscriber_count, channels_subscribed_to_count, is_subscribed) = tokio::try_join!(
        repo.count_subscribers(&user.id),
        repo.count_subscriptions(&user.id),
        is_subscribed,
    )?;

    Ok(ChannelProfile {
        user,
        subscriber_count,
        channels_subscribed_to_count,
        is_subscribed,
    })
}

/// Totals for the caller's own channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    pub total_videos: u64,
    pub total_views: u64,
    /// Likes given by the channel owner
    pub total_likes: u64,
    pub total_subscribers: u64,
}

/// The four aggregates run concurrently; any failure fails the whole view
pub async fn channel_stats(
    repo: &dyn TransactionalRepository,
    owner_id: &str,
) -> Result<ChannelStats, DomainError> {
    if !is_valid_id(owner_id) {
        return Err(DomainError::validation("Invalid User Id"));
    }

    let (total_videos, total_views, total_likes, total_subscribers) = tokio::try_join!(
        repo.count_videos_by_owner(owner_id),
        repo.sum_video_views_by_owner(owner_id),
        repo.count_likes_by_user(owner_id),
        repo.count_subscribers(owner_id),
    )?;

    Ok(ChannelStats {
        total_videos,
        total_views,
        total_likes,
        total_subscribers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user::tests::new_user;
    use crate::data::sqlite::repositories::video::tests::new_video;
    use crate::data::types::LikeTarget;
    use crate::domain::test_repo;

    #[tokio::test]
    async fn test_profile_counts_and_is_subscribed() {
        let repo = test_repo().await;
        let channel = repo.create_user(&new_user("chan")).await.unwrap();
        let fan = repo.create_user(&new_user("fan")).await.unwrap();
        let other = repo.create_user(&new_user("other")).await.unwrap();

        repo.insert_subscription(&fan.id, &channel.id).await.unwrap();
        repo.insert_subscription(&channel.id, &other.id).await.unwrap();

        let as_fan = channel_profile(repo.as_ref(), "  CHAN ", Some(fan.id.as_str()))
            .await
            .unwrap();
        assert_eq!(as_fan.user.id, channel.id);
        assert_eq!(as_fan.subscriber_count, 1);
        assert_eq!(as_fan.channels_subscribed_to_count, 1);
        assert!(as_fan.is_subscribed);

        let as_other = channel_profile(repo.as_ref(), "chan", Some(other.id.as_str()))
            .await
            .unwrap();
        assert!(!as_other.is_subscribed);

        let anonymous = channel_profile(repo.as_ref(), "chan", None).await.unwrap();
        assert!(!anonymous.is_subscribed);
    }

    #[tokio::test]
    async fn test_profile_not_found_messages() {
        let repo = test_repo().await;

        let err = channel_profile(repo.as_ref(), "   ", None).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == "Username is missing"));

        let err = channel_profile(repo.as_ref(), "nobody", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == "Channel does not exist"));
    }

    #[tokio::test]
    async fn test_stats_without_videos_are_zero() {
        let repo = test_repo().await;
        let user = repo.create_user(&new_user("quiet")).await.unwrap();

        let stats = channel_stats(repo.as_ref(), &user.id).await.unwrap();
        assert_eq!(
            stats,
            ChannelStats {
                total_videos: 0,
                total_views: 0,
                total_likes: 0,
                total_subscribers: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_aggregate() {
        let repo = test_repo().await;
        let owner = repo.create_user(&new_user("owner")).await.unwrap();
        let fan = repo.create_user(&new_user("fan")).await.unwrap();

        let a = repo.create_video(&new_video(&owner.id, "a")).await.unwrap();
        let b = repo.create_video(&new_video(&owner.id, "b")).await.unwrap();
        repo.increment_video_views(&a.id).await.unwrap();
        repo.increment_video_views(&a.id).await.unwrap();
        repo.increment_video_views(&b.id).await.unwrap();

        repo.insert_like(&owner.id, &LikeTarget::Video(b.id.clone()))
            .await
            .unwrap();
        repo.insert_like(&fan.id, &LikeTarget::Video(a.id.clone()))
            .await
            .unwrap();
        repo.insert_subscription(&fan.id, &owner.id).await.unwrap();

        let stats = channel_stats(repo.as_ref(), &owner.id).await.unwrap();
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_views, 3);
        assert_eq!(stats.total_likes, 1);
        assert_eq!(stats.total_subscribers, 1);
    }

    #[tokio::test]
    async fn test_stats_reject_invalid_id() {
        let repo = test_repo().await;
        let err = channel_stats(repo.as_ref(), "bad id!").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m == "Invalid User Id"));
    }
}
