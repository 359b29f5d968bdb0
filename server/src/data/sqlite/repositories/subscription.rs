//! Subscription repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{SubscriptionRow, SubscriptionWithUser, UserSummary};

/// Returns true if a subscription was removed
pub async fn delete_subscription(
    pool: &SqlitePool,
    subscriber_id: &str,
    channel_id: &str,
) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = ? AND channel_id = ?")
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Insert a subscription unless one already exists.
/// Returns `None` when the unique index rejected the row.
pub async fn insert_subscription(
    pool: &SqlitePool,
    subscriber_id: &str,
    channel_id: &str,
) -> Result<Option<SubscriptionRow>, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query(
        r#"
        INSERT INTO subscriptions (id, subscriber_id, channel_id, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(subscriber_id)
    .bind(channel_id)
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(SubscriptionRow {
        id,
        subscriber_id: subscriber_id.to_string(),
        channel_id: channel_id.to_string(),
        created_at: now,
    }))
}

pub async fn is_subscribed(
    pool: &SqlitePool,
    subscriber_id: &str,
    channel_id: &str,
) -> Result<bool, SqliteError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE subscriber_id = ? AND channel_id = ?)",
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Number of users subscribed to a channel
pub async fn count_subscribers(pool: &SqlitePool, channel_id: &str) -> Result<u64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE channel_id = ?")
        .bind(channel_id)
        .fetch_one(pool)
        .await?;

    Ok(count as u64)
}

/// Number of channels a user is subscribed to
pub async fn count_subscriptions(
    pool: &SqlitePool,
    subscriber_id: &str,
) -> Result<u64, SqliteError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = ?")
            .bind(subscriber_id)
            .fetch_one(pool)
            .await?;

    Ok(count as u64)
}

/// Which side of the relation to resolve into a user
#[derive(Debug, Clone, Copy)]
enum Side {
    Subscriber,
    Channel,
}

async fn list_with_user(
    pool: &SqlitePool,
    side: Side,
    key: &str,
) -> Result<Vec<SubscriptionWithUser>, SqliteError> {
    let (filter_column, join_column) = match side {
        Side::Subscriber => ("channel_id", "subscriber_id"),
        Side::Channel => ("subscriber_id", "channel_id"),
    };

    let rows = sqlx::query_as::<
        _,
        (
            String,
            String,
            String,
            i64,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
        ),
    >(&format!(
        r#"
        SELECT s.id, s.subscriber_id, s.channel_id, s.created_at,
               u.username, u.full_name, u.email, u.avatar
        FROM subscriptions s
        LEFT JOIN users u ON u.id = s.{join_column}
        WHERE s.{filter_column} = ?
        ORDER BY s.created_at DESC, s.rowid DESC
        "#
    ))
    .bind(key)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|t| {
            let user_id = match side {
                Side::Subscriber => t.1.clone(),
                Side::Channel => t.2.clone(),
            };
            let user = match (t.4, t.5, t.6, t.7) {
                (Some(username), Some(full_name), Some(email), Some(avatar)) => {
                    Some(UserSummary {
                        id: user_id,
                        username,
                        full_name,
                        email,
                        avatar,
                    })
                }
                _ => None,
            };
            SubscriptionWithUser {
                subscription: SubscriptionRow {
                    id: t.0,
                    subscriber_id: t.1,
                    channel_id: t.2,
                    created_at: t.3,
                },
                user,
            }
        })
        .collect())
}

/// A channel's subscribers, newest first, each resolved to the subscribing user
pub async fn list_subscribers(
    pool: &SqlitePool,
    channel_id: &str,
) -> Result<Vec<SubscriptionWithUser>, SqliteError> {
    list_with_user(pool, Side::Subscriber, channel_id).await
}

/// Channels a user follows, newest first, each resolved to the channel user
pub async fn list_subscribed_channels(
    pool: &SqlitePool,
    subscriber_id: &str,
) -> Result<Vec<SubscriptionWithUser>, SqliteError> {
    list_with_user(pool, Side::Channel, subscriber_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user;
    use crate::data::sqlite::test_pool;

    #[tokio::test]
    async fn test_insert_delete_and_counts() {
        let pool = test_pool().await;

        assert!(insert_subscription(&pool, "a", "b").await.unwrap().is_some());
        assert!(insert_subscription(&pool, "a", "b").await.unwrap().is_none());
        insert_subscription(&pool, "c", "b").await.unwrap();

        assert!(is_subscribed(&pool, "a", "b").await.unwrap());
        assert!(!is_subscribed(&pool, "b", "a").await.unwrap());
        assert_eq!(count_subscribers(&pool, "b").await.unwrap(), 2);
        assert_eq!(count_subscriptions(&pool, "a").await.unwrap(), 1);

        assert!(delete_subscription(&pool, "a", "b").await.unwrap());
        assert!(!delete_subscription(&pool, "a", "b").await.unwrap());
        assert_eq!(count_subscribers(&pool, "b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_self_subscription_rejected_by_schema() {
        let pool = test_pool().await;
        assert!(insert_subscription(&pool, "a", "a").await.is_err());
    }

    #[tokio::test]
    async fn test_lists_resolve_other_side() {
        let pool = test_pool().await;
        let fan = user::create_user(&pool, &user::tests::new_user("fan"))
            .await
            .unwrap();
        let star = user::create_user(&pool, &user::tests::new_user("star"))
            .await
            .unwrap();

        insert_subscription(&pool, &fan.id, &star.id).await.unwrap();

        let subscribers = list_subscribers(&pool, &star.id).await.unwrap();
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].user.as_ref().unwrap().username, "fan");

        let channels = list_subscribed_channels(&pool, &fan.id).await.unwrap();
        assert_eq!(channels.len(), 1);
        let channel = channels[0].user.as_ref().unwrap();
        assert_eq!(channel.id, star.id);
        assert_eq!(channel.email, "star@example.com");
    }
}
