//! Create-or-delete relations (likes, subscriptions)
//!
//! A toggle first tries to delete the caller's relation. If nothing was
//! deleted it inserts one; the unique index makes that insert a no-op when a
//! concurrent request created the row first, which surfaces as a conflict
//! rather than a duplicate.

use crate::data::TransactionalRepository;
use crate::data::types::{LikeRow, LikeTarget, SubscriptionRow};

use super::error::DomainError;

/// Outcome of a toggle
#[derive(Debug, Clone)]
pub enum Toggled<T> {
    Created(T),
    Deleted,
}

impl<T> Toggled<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

const CONCURRENT_TOGGLE: &str = "Request conflicted with a concurrent update, please retry";

/// Like or unlike a video, comment or tweet
pub async fn toggle_like(
    repo: &dyn TransactionalRepository,
    liked_by: &str,
    target: &LikeTarget,
) -> Result<Toggled<LikeRow>, DomainError> {
    if repo.delete_like(liked_by, target).await? {
        tracing::debug!(liked_by, target = target.id(), "Like removed");
        return Ok(Toggled::Deleted);
    }

    match repo.insert_like(liked_by, target).await? {
        Some(row) => {
            tracing::debug!(liked_by, target = target.id(), "Like created");
            Ok(Toggled::Created(row))
        }
        None => Err(DomainError::conflict(CONCURRENT_TOGGLE)),
    }
}

/// Subscribe to or unsubscribe from a channel
///
/// Self-subscription is rejected before the store is touched. The channel
/// must exist.
pub async fn toggle_subscription(
    repo: &dyn TransactionalRepository,
    subscriber_id: &str,
    channel_id: &str,
) -> Result<Toggled<SubscriptionRow>, DomainError> {
    if subscriber_id == channel_id {
        return Err(DomainError::validation("You cannot subscribe to yourself"));
    }

    if repo.get_user(channel_id).await?.is_none() {
        return Err(DomainError::not_found("Channel Not Found"));
    }

    if repo.delete_subscription(subscriber_id, channel_id).await? {
        tracing::debug!(subscriber_id, channel_id, "Subscription removed");
        return Ok(Toggled::Deleted);
    }

    match repo.insert_subscription(subscriber_id, channel_id).await? {
        Some(row) => {
            tracing::debug!(subscriber_id, channel_id, "Subscription created");
            Ok(Toggled::Created(row))
        }
        None => Err(DomainError::conflict(CONCURRENT_TOGGLE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user::tests::new_user;
    use crate::domain::test_repo;

    #[tokio::test]
    async fn test_like_toggle_pair_restores_state() {
        let repo = test_repo().await;
        let target = LikeTarget::Video("v1".to_string());

        let first = toggle_like(repo.as_ref(), "u1", &target).await.unwrap();
        assert!(first.is_created());
        assert_eq!(repo.count_likes_by_user("u1").await.unwrap(), 1);

        let second = toggle_like(repo.as_ref(), "u1", &target).await.unwrap();
        assert!(matches!(second, Toggled::Deleted));
        assert_eq!(repo.count_likes_by_user("u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_like_targets_are_independent() {
        let repo = test_repo().await;

        toggle_like(repo.as_ref(), "u1", &LikeTarget::Video("x".into()))
            .await
            .unwrap();
        let comment = toggle_like(repo.as_ref(), "u1", &LikeTarget::Comment("x".into()))
            .await
            .unwrap();
        assert!(comment.is_created());
        assert_eq!(repo.count_likes_by_user("u1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_self_subscription_rejected_before_store() {
        let repo = test_repo().await;

        // No such user exists, so reaching the store would yield NotFound instead
        let err = toggle_subscription(repo.as_ref(), "ghost", "ghost")
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::Validation(ref m) if m == "You cannot subscribe to yourself")
        );
        assert_eq!(repo.count_subscriptions("ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_subscription_requires_channel() {
        let repo = test_repo().await;
        let err = toggle_subscription(repo.as_ref(), "u1", "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == "Channel Not Found"));
    }

    #[tokio::test]
    async fn test_subscription_toggle_pair() {
        let repo = test_repo().await;
        let fan = repo.create_user(&new_user("fan")).await.unwrap();
        let channel = repo.create_user(&new_user("channel")).await.unwrap();

        let created = toggle_subscription(repo.as_ref(), &fan.id, &channel.id)
            .await
            .unwrap();
        assert!(created.is_created());
        assert!(repo.is_subscribed(&fan.id, &channel.id).await.unwrap());

        let deleted = toggle_subscription(repo.as_ref(), &fan.id, &channel.id)
            .await
            .unwrap();
        assert!(matches!(deleted, Toggled::Deleted));
        assert_eq!(repo.count_subscribers(&channel.id).await.unwrap(), 0);
    }
}
