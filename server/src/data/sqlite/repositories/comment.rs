//! Comment repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{CommentRow, CommentWithOwner, UserSummary};

type CommentTuple = (String, String, String, String, i64, i64);

type CommentOwnerTuple = (
    String,
    String,
    String,
    String,
    i64,
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn to_comment_row(t: CommentTuple) -> CommentRow {
    CommentRow {
        id: t.0,
        video_id: t.1,
        owner_id: t.2,
        content: t.3,
        created_at: t.4,
        updated_at: t.5,
    }
}

pub async fn create_comment(
    pool: &SqlitePool,
    video_id: &str,
    owner_id: &str,
    content: &str,
) -> Result<CommentRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        "INSERT INTO comments (id, video_id, owner_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(video_id)
    .bind(owner_id)
    .bind(content)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(CommentRow {
        id,
        video_id: video_id.to_string(),
        owner_id: owner_id.to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_comment(pool: &SqlitePool, id: &str) -> Result<Option<CommentRow>, SqliteError> {
    let row = sqlx::query_as::<_, CommentTuple>(
        "SELECT id, video_id, owner_id, content, created_at, updated_at FROM comments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_comment_row))
}

pub async fn update_content(
    pool: &SqlitePool,
    id: &str,
    content: &str,
) -> Result<Option<CommentRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();
    let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
        .bind(content)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_comment(pool, id).await
}

pub async fn delete_comment(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_for_video(pool: &SqlitePool, video_id: &str) -> Result<u64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE video_id = ?")
        .bind(video_id)
        .fetch_one(pool)
        .await?;

    Ok(count as u64)
}

/// One window of a video's comments, newest first.
///
/// Left join: a comment whose owner no longer exists is kept with `owner: None`.
pub async fn list_for_video(
    pool: &SqlitePool,
    video_id: &str,
    offset: i64,
    limit: i64,
) -> Result<Vec<CommentWithOwner>, SqliteError> {
    let rows = sqlx::query_as::<_, CommentOwnerTuple>(
        r#"
        SELECT c.id, c.video_id, c.owner_id, c.content, c.created_at, c.updated_at,
               u.id, u.username, u.full_name, u.email, u.avatar
        FROM comments c
        LEFT JOIN users u ON u.id = c.owner_id
        WHERE c.video_id = ?
        ORDER BY c.created_at DESC, c.rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(video_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|t| {
            let owner = match (t.6, t.7, t.8, t.9, t.10) {
                (Some(id), Some(username), Some(full_name), Some(email), Some(avatar)) => {
                    Some(UserSummary {
                        id,
                        username,
                        full_name,
                        email,
                        avatar,
                    })
                }
                _ => None,
            };
            CommentWithOwner {
                comment: to_comment_row((t.0, t.1, t.2, t.3, t.4, t.5)),
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
    async fn test_comment_crud() {
        let pool = test_pool().await;
        let comment = create_comment(&pool, "v1", "u1", "first!").await.unwrap();

        let updated = update_content(&pool, &comment.id, "edited")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "edited");
        assert_eq!(updated.video_id, "v1");

        assert!(delete_comment(&pool, &comment.id).await.unwrap());
        assert!(get_comment(&pool, &comment.id).await.unwrap().is_none());
        assert!(update_content(&pool, &comment.id, "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_orphaned_comments() {
        let pool = test_pool().await;
        let alice = user::create_user(&pool, &user::tests::new_user("alice"))
            .await
            .unwrap();

        create_comment(&pool, "v1", &alice.id, "hello").await.unwrap();
        create_comment(&pool, "v1", "deleted-user", "orphan").await.unwrap();
        create_comment(&pool, "v2", &alice.id, "elsewhere").await.unwrap();

        assert_eq!(count_for_video(&pool, "v1").await.unwrap(), 2);

        let page = list_for_video(&pool, "v1", 0, 10).await.unwrap();
        assert_eq!(page.len(), 2);
        // Newest first
        assert_eq!(page[0].comment.content, "orphan");
        assert!(page[0].owner.is_none());
        assert_eq!(page[1].owner.as_ref().unwrap().username, "alice");

        let second = list_for_video(&pool, "v1", 1, 1).await.unwrap();
        assert_eq!(second[0].comment.content, "hello");
    }
}
