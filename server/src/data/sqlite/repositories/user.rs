//! User repository for SQLite operations
//!
//! Covers identity records and each user's ordered watch history.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{NewUser, UserRow, UserSummary};

const USER_COLUMNS: &str = "id, username, email, full_name, avatar, cover_image, password_hash, refresh_token_hash, created_at, updated_at";

const DUPLICATE_USER: &str = "User with email or username already exists";

type UserTuple = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    i64,
    i64,
);

fn to_user_row(t: UserTuple) -> UserRow {
    UserRow {
        id: t.0,
        username: t.1,
        email: t.2,
        full_name: t.3,
        avatar: t.4,
        cover_image: t.5,
        password_hash: t.6,
        refresh_token_hash: t.7,
        created_at: t.8,
        updated_at: t.9,
    }
}

/// Create a new user with a generated CUID2 ID.
///
/// A taken username or email yields `SqliteError::Conflict`.
pub async fn create_user(pool: &SqlitePool, new: &NewUser) -> Result<UserRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, full_name, avatar, cover_image, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.full_name)
    .bind(&new.avatar)
    .bind(&new.cover_image)
    .bind(&new.password_hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, DUPLICATE_USER))?;

    Ok(UserRow {
        id,
        username: new.username.clone(),
        email: new.email.clone(),
        full_name: new.full_name.clone(),
        avatar: new.avatar.clone(),
        cover_image: new.cover_image.clone(),
        password_hash: new.password_hash.clone(),
        refresh_token_hash: None,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_user_row))
}

/// Find a user whose username or email matches. Absent arguments never match.
pub async fn find_by_login(
    pool: &SqlitePool,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ? OR email = ? ORDER BY created_at LIMIT 1"
    ))
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_user_row))
}

pub async fn get_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_user_row))
}

/// Batch lookup of public user fields. Missing ids are simply absent.
pub async fn get_summaries(
    pool: &SqlitePool,
    ids: &[String],
) -> Result<Vec<UserSummary>, SqliteError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, username, full_name, email, avatar FROM users WHERE id IN (",
    );
    {
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
    }
    qb.push(")");

    let rows = qb
        .build_query_as::<(String, String, String, String, String)>()
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, username, full_name, email, avatar)| UserSummary {
            id,
            username,
            full_name,
            email,
            avatar,
        })
        .collect())
}

/// Replace full name, username and email. Returns the updated row.
pub async fn update_account(
    pool: &SqlitePool,
    id: &str,
    full_name: &str,
    username: &str,
    email: &str,
) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query(
        "UPDATE users SET full_name = ?, username = ?, email = ?, updated_at = ? WHERE id = ?",
    )
    .bind(full_name)
    .bind(username)
    .bind(email)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::unique_as_conflict(e, DUPLICATE_USER))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_user(pool, id).await
}

pub async fn update_avatar(
    pool: &SqlitePool,
    id: &str,
    url: &str,
) -> Result<Option<UserRow>, SqliteError> {
    set_media_column(pool, id, "avatar", url).await
}

pub async fn update_cover_image(
    pool: &SqlitePool,
    id: &str,
    url: &str,
) -> Result<Option<UserRow>, SqliteError> {
    set_media_column(pool, id, "cover_image", url).await
}

async fn set_media_column(
    pool: &SqlitePool,
    id: &str,
    column: &'static str,
    url: &str,
) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query(&format!(
        "UPDATE users SET {column} = ?, updated_at = ? WHERE id = ?"
    ))
    .bind(url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_user(pool, id).await
}

/// Store a new password hash. Returns false if the user does not exist.
pub async fn set_password_hash(
    pool: &SqlitePool,
    id: &str,
    password_hash: &str,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Store (or clear, with `None`) the current refresh token fingerprint
pub async fn set_refresh_token_hash(
    pool: &SqlitePool,
    id: &str,
    hash: Option<&str>,
) -> Result<bool, SqliteError> {
    let result = sqlx::query("UPDATE users SET refresh_token_hash = ? WHERE id = ?")
        .bind(hash)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Watch history
// ============================================================================

/// Append a video to the end of a user's history (idempotent).
/// Returns true if appended, false if it was already present.
pub async fn append_watch_history(
    pool: &SqlitePool,
    user_id: &str,
    video_id: &str,
) -> Result<bool, SqliteError> {
    let result = sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id, position)
        SELECT ?, ?, COALESCE(MAX(position), 0) + 1 FROM watch_history WHERE user_id = ?
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Video ids in the order they were appended
pub async fn watch_history_ids(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<String>, SqliteError> {
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT video_id FROM watch_history WHERE user_id = ? ORDER BY position ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
