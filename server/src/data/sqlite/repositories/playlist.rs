//! Playlist repository for SQLite operations
//!
//! A playlist's videos live in `playlist_videos`, ordered by `position` and
//! unique per playlist.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::PlaylistRow;

const DUPLICATE_NAME: &str = "You already have a playlist with this name";

type PlaylistTuple = (String, String, String, String, i64, i64);

fn to_playlist_row(t: PlaylistTuple, video_ids: Vec<String>) -> PlaylistRow {
    PlaylistRow {
        id: t.0,
        owner_id: t.1,
        name: t.2,
        description: t.3,
        video_ids,
        created_at: t.4,
        updated_at: t.5,
    }
}

pub async fn create_playlist(
    pool: &SqlitePool,
    owner_id: &str,
    name: &str,
    description: &str,
) -> Result<PlaylistRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        "INSERT INTO playlists (id, owner_id, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, DUPLICATE_NAME))?;

    Ok(PlaylistRow {
        id,
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        video_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

async fn video_ids(pool: &SqlitePool, playlist_id: &str) -> Result<Vec<String>, SqliteError> {
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT video_id FROM playlist_videos WHERE playlist_id = ? ORDER BY position ASC",
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn get_playlist(pool: &SqlitePool, id: &str) -> Result<Option<PlaylistRow>, SqliteError> {
    let row = sqlx::query_as::<_, PlaylistTuple>(
        "SELECT id, owner_id, name, description, created_at, updated_at FROM playlists WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(t) => {
            let ids = video_ids(pool, &t.0).await?;
            Ok(Some(to_playlist_row(t, ids)))
        }
        None => Ok(None),
    }
}

/// An owner's playlists, oldest first, each with its ordered video ids
pub async fn list_by_owner(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Vec<PlaylistRow>, SqliteError> {
    let rows = sqlx::query_as::<_, PlaylistTuple>(
        "SELECT id, owner_id, name, description, created_at, updated_at FROM playlists WHERE owner_id = ? ORDER BY created_at ASC, rowid ASC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT playlist_id, video_id FROM playlist_videos WHERE playlist_id IN (",
    );
    {
        let mut separated = qb.separated(", ");
        for row in &rows {
            separated.push_bind(row.0.clone());
        }
    }
    qb.push(") ORDER BY position ASC");

    let entries = qb
        .build_query_as::<(String, String)>()
        .fetch_all(pool)
        .await?;

    let mut by_playlist: HashMap<String, Vec<String>> = HashMap::new();
    for (playlist_id, video_id) in entries {
        by_playlist.entry(playlist_id).or_default().push(video_id);
    }

    Ok(rows
        .into_iter()
        .map(|t| {
            let ids = by_playlist.remove(&t.0).unwrap_or_default();
            to_playlist_row(t, ids)
        })
        .collect())
}

/// Update name and/or description. `None` leaves the field unchanged.
pub async fn update_playlist(
    pool: &SqlitePool,
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<PlaylistRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query(
        "UPDATE playlists SET name = COALESCE(?, name), description = COALESCE(?, description), updated_at = ? WHERE id = ?",
    )
    .bind(name)
    .bind(description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, DUPLICATE_NAME))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_playlist(pool, id).await
}

/// Delete a playlist and its video entries
pub async fn delete_playlist(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Append a video to the end of a playlist.
/// Returns false if the video is already in it.
pub async fn add_video(
    pool: &SqlitePool,
    playlist_id: &str,
    video_id: &str,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO playlist_videos (playlist_id, video_id, position)
        SELECT ?, ?, COALESCE(MAX(position), 0) + 1 FROM playlist_videos WHERE playlist_id = ?
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(video_id)
    .bind(playlist_id)
    .execute(&mut *tx)
    .await?;

    let added = result.rows_affected() > 0;
    if added {
        sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(added)
}

/// Remove a video from a playlist. Returns false if it was not there.
pub async fn remove_video(
    pool: &SqlitePool,
    playlist_id: &str,
    video_id: &str,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = ? AND video_id = ?")
        .bind(playlist_id)
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    let removed = result.rows_affected() > 0;
    if removed {
        sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::test_pool;

    #[tokio::test]
    async fn test_create_and_duplicate_name() {
        let pool = test_pool().await;
        let playlist = create_playlist(&pool, "u1", "Mix", "tunes").await.unwrap();
        assert!(playlist.video_ids.is_empty());

        let err = create_playlist(&pool, "u1", "Mix", "again").await.unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));

        // Case-sensitive, per owner
        create_playlist(&pool, "u1", "mix", "lower").await.unwrap();
        create_playlist(&pool, "u2", "Mix", "other owner").await.unwrap();
    }

    #[tokio::test]
    async fn test_videos_keep_order_without_duplicates() {
        let pool = test_pool().await;
        let playlist = create_playlist(&pool, "u1", "Queue", "later").await.unwrap();

        assert!(add_video(&pool, &playlist.id, "v2").await.unwrap());
        assert!(add_video(&pool, &playlist.id, "v1").await.unwrap());
        assert!(!add_video(&pool, &playlist.id, "v2").await.unwrap());
        assert!(add_video(&pool, &playlist.id, "v3").await.unwrap());

        let fetched = get_playlist(&pool, &playlist.id).await.unwrap().unwrap();
        assert_eq!(fetched.video_ids, vec!["v2", "v1", "v3"]);

        assert!(remove_video(&pool, &playlist.id, "v1").await.unwrap());
        assert!(!remove_video(&pool, &playlist.id, "v1").await.unwrap());
        let fetched = get_playlist(&pool, &playlist.id).await.unwrap().unwrap();
        assert_eq!(fetched.video_ids, vec!["v2", "v3"]);
    }

    #[tokio::test]
    async fn test_list_update_delete() {
        let pool = test_pool().await;
        let a = create_playlist(&pool, "u1", "A", "first").await.unwrap();
        let b = create_playlist(&pool, "u1", "B", "second").await.unwrap();
        add_video(&pool, &b.id, "v9").await.unwrap();

        let listed = list_by_owner(&pool, "u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, a.id);
        assert_eq!(listed[1].video_ids, vec!["v9"]);

        let renamed = update_playlist(&pool, &a.id, Some("A2"), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "A2");
        assert_eq!(renamed.description, "first");

        let err = update_playlist(&pool, &a.id, Some("B"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));

        assert!(delete_playlist(&pool, &b.id).await.unwrap());
        assert!(get_playlist(&pool, &b.id).await.unwrap().is_none());
        assert!(!delete_playlist(&pool, &b.id).await.unwrap());
        assert!(list_by_owner(&pool, "u1").await.unwrap().len() == 1);
    }
}
