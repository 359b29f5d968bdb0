//! Tweet repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{TweetRow, TweetWithOwner, UserSummary};

type TweetTuple = (String, String, String, i64, i64);

fn to_tweet_row(t: TweetTuple) -> TweetRow {
    TweetRow {
        id: t.0,
        owner_id: t.1,
        content: t.2,
        created_at: t.3,
        updated_at: t.4,
    }
}

pub async fn create_tweet(
    pool: &SqlitePool,
    owner_id: &str,
    content: &str,
) -> Result<TweetRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        "INSERT INTO tweets (id, owner_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(owner_id)
    .bind(content)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(TweetRow {
        id,
        owner_id: owner_id.to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_tweet(pool: &SqlitePool, id: &str) -> Result<Option<TweetRow>, SqliteError> {
    let row = sqlx::query_as::<_, TweetTuple>(
        "SELECT id, owner_id, content, created_at, updated_at FROM tweets WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_tweet_row))
}

pub async fn update_content(
    pool: &SqlitePool,
    id: &str,
    content: &str,
) -> Result<Option<TweetRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();
    let result = sqlx::query("UPDATE tweets SET content = ?, updated_at = ? WHERE id = ?")
        .bind(content)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_tweet(pool, id).await
}

pub async fn delete_tweet(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM tweets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// A user's tweets, newest first, joined to the owner
pub async fn list_by_owner(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Vec<TweetWithOwner>, SqliteError> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            String,
            String,
            i64,
            i64,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
        ),
    >(
        r#"
        SELECT t.id, t.owner_id, t.content, t.created_at, t.updated_at,
               u.username, u.full_name, u.email, u.avatar
        FROM tweets t
        LEFT JOIN users u ON u.id = t.owner_id
        WHERE t.owner_id = ?
        ORDER BY t.created_at DESC, t.rowid DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|t| {
            let owner = match (t.5, t.6, t.7, t.8) {
                (Some(username), Some(full_name), Some(email), Some(avatar)) => {
                    Some(UserSummary {
                        id: t.1.clone(),
                        username,
                        full_name,
                        email,
                        avatar,
                    })
                }
                _ => None,
            };
            TweetWithOwner {
                tweet: to_tweet_row((t.0, t.1, t.2, t.3, t.4)),
                owner,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user;
    use crate::data::sqlite::test_pool;

    #[tokio::test]
    async fn test_tweet_crud_and_listing() {
        let pool = test_pool().await;
        let author = user::create_user(&pool, &user::tests::new_user("poster"))
            .await
            .unwrap();

        let first = create_tweet(&pool, &author.id, "one").await.unwrap();
        let second = create_tweet(&pool, &author.id, "two").await.unwrap();
        create_tweet(&pool, "someone-else", "three").await.unwrap();

        let listed = list_by_owner(&pool, &author.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].tweet.id, second.id);
        assert_eq!(listed[0].owner.as_ref().unwrap().username, "poster");

        let edited = update_content(&pool, &first.id, "uno").await.unwrap().unwrap();
        assert_eq!(edited.content, "uno");

        assert!(delete_tweet(&pool, &first.id).await.unwrap());
        assert!(get_tweet(&pool, &first.id).await.unwrap().is_none());
    }
}
