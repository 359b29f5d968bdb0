//! Like repository for SQLite operations
//!
//! The partial unique indexes on `likes` allow at most one row per
//! (liked_by, target). Inserts are conditional on that constraint.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{LikeRow, LikeTarget, LikedVideoRow, VideoRow};

/// Remove the caller's like on a target.
/// Returns true if a like was removed.
pub async fn delete_like(
    pool: &SqlitePool,
    liked_by: &str,
    target: &LikeTarget,
) -> Result<bool, SqliteError> {
    let result = sqlx::query(&format!(
        "DELETE FROM likes WHERE liked_by = ? AND {} = ?",
        target.column()
    ))
    .bind(liked_by)
    .bind(target.id())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Insert a like unless one already exists.
/// Returns `None` when the unique index rejected the row.
pub async fn insert_like(
    pool: &SqlitePool,
    liked_by: &str,
    target: &LikeTarget,
) -> Result<Option<LikeRow>, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query(&format!(
        "INSERT INTO likes (id, liked_by, {}, created_at) VALUES (?, ?, ?, ?) ON CONFLICT DO NOTHING",
        target.column()
    ))
    .bind(&id)
    .bind(liked_by)
    .bind(target.id())
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(LikeRow {
        id,
        liked_by: liked_by.to_string(),
        target: target.clone(),
        created_at: now,
    }))
}

/// Likes given by a user, across all target kinds
pub async fn count_by_user(pool: &SqlitePool, liked_by: &str) -> Result<u64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE liked_by = ?")
        .bind(liked_by)
        .fetch_one(pool)
        .await?;

    Ok(count as u64)
}

/// A user's video likes, newest first, with each video resolved when it still exists
pub async fn list_liked_videos(
    pool: &SqlitePool,
    liked_by: &str,
) -> Result<Vec<LikedVideoRow>, SqliteError> {
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
            Option<String>,
            Option<String>,
            Option<i64>,
            Option<i64>,
            Option<bool>,
            Option<i64>,
            Option<i64>,
        ),
    >(
        r#"
        SELECT l.id, l.liked_by, l.video_id, l.created_at,
               v.owner_id, v.title, v.description, v.category, v.video_file, v.thumbnail,
               v.duration, v.views, v.is_published, v.created_at, v.updated_at
        FROM likes l
        LEFT JOIN videos v ON v.id = l.video_id
        WHERE l.liked_by = ? AND l.video_id IS NOT NULL
        ORDER BY l.created_at DESC, l.rowid DESC
        "#,
    )
    .bind(liked_by)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|t| {
            let video = match (t.4, t.5, t.6, t.7, t.8, t.9, t.10, t.11, t.12, t.13, t.14) {
                (
                    Some(owner_id),
                    Some(title),
                    Some(description),
                    Some(category),
                    Some(video_file),
                    Some(thumbnail),
                    Some(duration),
                    Some(views),
                    Some(is_published),
                    Some(created_at),
                    Some(updated_at),
                ) => Some(VideoRow {
                    id: t.2.clone(),
                    owner_id,
                    title,
                    description,
                    category,
                    video_file,
                    thumbnail,
                    duration,
                    views,
                    is_published,
                    created_at,
                    updated_at,
                }),
                _ => None,
            };
            LikedVideoRow {
                like: LikeRow {
                    id: t.0,
                    liked_by: t.1,
                    target: LikeTarget::Video(t.2),
                    created_at: t.3,
                },
                video,
            }
        })
        .collect())
}
