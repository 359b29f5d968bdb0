//! Video repository for SQLite operations
//!
//! The feed count and feed page share one WHERE builder so the two passes of
//! pagination always agree.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{
    NewVideo, UserSummary, VideoFeedFilter, VideoPatch, VideoRow, VideoSort, VideoWithOwner,
};
use crate::utils::sql::contains_pattern;

const VIDEO_COLUMNS: &str = "v.id, v.owner_id, v.title, v.description, v.category, v.video_file, v.thumbnail, v.duration, v.views, v.is_published, v.created_at, v.updated_at";

/// Owner columns appended to `VIDEO_COLUMNS` for inner-joined reads
const OWNER_COLUMNS: &str = "u.username, u.full_name, u.email, u.avatar";

type VideoTuple = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    i64,
    i64,
    bool,
    i64,
    i64,
);

type VideoOwnerTuple = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    i64,
    i64,
    bool,
    i64,
    i64,
    String,
    String,
    String,
    String,
);

fn to_video_row(t: VideoTuple) -> VideoRow {
    VideoRow {
        id: t.0,
        owner_id: t.1,
        title: t.2,
        description: t.3,
        category: t.4,
        video_file: t.5,
        thumbnail: t.6,
        duration: t.7,
        views: t.8,
        is_published: t.9,
        created_at: t.10,
        updated_at: t.11,
    }
}

fn to_video_with_owner(t: VideoOwnerTuple) -> VideoWithOwner {
    let owner = UserSummary {
        id: t.1.clone(),
        username: t.12,
        full_name: t.13,
        email: t.14,
        avatar: t.15,
    };
    let video = to_video_row((t.0, t.1, t.2, t.3, t.4, t.5, t.6, t.7, t.8, t.9, t.10, t.11));
    VideoWithOwner {
        video,
        owner: Some(owner),
    }
}

/// Create a published video with zero views
pub async fn create_video(pool: &SqlitePool, new: &NewVideo) -> Result<VideoRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO videos (id, owner_id, title, description, category, video_file, thumbnail, duration, views, is_published, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 1, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.owner_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.category)
    .bind(&new.video_file)
    .bind(&new.thumbnail)
    .bind(new.duration)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(VideoRow {
        id,
        owner_id: new.owner_id.clone(),
        title: new.title.clone(),
        description: new.description.clone(),
        category: new.category.clone(),
        video_file: new.video_file.clone(),
        thumbnail: new.thumbnail.clone(),
        duration: new.duration,
        views: 0,
        is_published: true,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_video(pool: &SqlitePool, id: &str) -> Result<Option<VideoRow>, SqliteError> {
    let row = sqlx::query_as::<_, VideoTuple>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_video_row))
}

/// Video joined to its owner. `None` when either side is missing.
pub async fn get_video_with_owner(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<VideoWithOwner>, SqliteError> {
    let row = sqlx::query_as::<_, VideoOwnerTuple>(&format!(
        "SELECT {VIDEO_COLUMNS}, {OWNER_COLUMNS} FROM videos v JOIN users u ON u.id = v.owner_id WHERE v.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_video_with_owner))
}

/// Batch lookup. Result order is unspecified and missing ids are absent.
pub async fn get_videos_by_ids(
    pool: &SqlitePool,
    ids: &[String],
) -> Result<Vec<VideoRow>, SqliteError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id IN ("
    ));
    {
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
    }
    qb.push(")");

    let rows = qb.build_query_as::<VideoTuple>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(to_video_row).collect())
}

/// Apply a partial update. An empty patch leaves the row untouched.
pub async fn update_video(
    pool: &SqlitePool,
    id: &str,
    patch: &VideoPatch,
) -> Result<Option<VideoRow>, SqliteError> {
    if patch.is_empty() {
        return get_video(pool, id).await;
    }

    let now = chrono::Utc::now().timestamp_millis();
    let result = sqlx::query(
        r#"
        UPDATE videos SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            thumbnail = COALESCE(?, thumbnail),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.category.as_deref())
    .bind(patch.thumbnail.as_deref())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_video(pool, id).await
}

pub async fn set_published(
    pool: &SqlitePool,
    id: &str,
    is_published: bool,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();
    let result = sqlx::query("UPDATE videos SET is_published = ?, updated_at = ? WHERE id = ?")
        .bind(is_published)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_video(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM videos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn increment_views(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("UPDATE videos SET views = views + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Feed
// ============================================================================

/// Append the feed predicate. The builder must already end in a WHERE clause.
fn push_feed_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &VideoFeedFilter) {
    if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
        let pattern = contains_pattern(query);
        qb.push(" AND (v.title LIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR v.description LIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
    if let Some(owner_id) = &filter.owner_id {
        qb.push(" AND v.owner_id = ").push_bind(owner_id.clone());
    }
    if let Some(category) = &filter.category {
        qb.push(" AND v.category = ").push_bind(category.clone());
    }
    if let Some(is_published) = filter.is_published {
        qb.push(" AND v.is_published = ").push_bind(is_published);
    }
    if let Some(min) = filter.min_views {
        qb.push(" AND v.views >= ").push_bind(min);
    }
    if let Some(max) = filter.max_views {
        qb.push(" AND v.views <= ").push_bind(max);
    }
    if let Some(min) = filter.min_duration {
        qb.push(" AND v.duration >= ").push_bind(min);
    }
    if let Some(max) = filter.max_duration {
        qb.push(" AND v.duration <= ").push_bind(max);
    }
}

/// Count feed videos. Videos whose owner no longer exists are not counted.
pub async fn count_feed(pool: &SqlitePool, filter: &VideoFeedFilter) -> Result<u64, SqliteError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) FROM videos v JOIN users u ON u.id = v.owner_id WHERE 1 = 1",
    );
    push_feed_filter(&mut qb, filter);

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count as u64)
}

/// One window of the feed, joined to uploaders. Ties break on insertion order.
pub async fn list_feed(
    pool: &SqlitePool,
    filter: &VideoFeedFilter,
    sort: VideoSort,
    offset: i64,
    limit: i64,
) -> Result<Vec<VideoWithOwner>, SqliteError> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {VIDEO_COLUMNS}, {OWNER_COLUMNS} FROM videos v JOIN users u ON u.id = v.owner_id WHERE 1 = 1"
    ));
    push_feed_filter(&mut qb, filter);
    qb.push(format!(
        " ORDER BY {} {}, v.rowid DESC LIMIT ",
        sort.field.column(),
        sort.direction.as_sql()
    ))
    .push_bind(limit)
    .push(" OFFSET ")
    .push_bind(offset);

    let rows = qb
        .build_query_as::<VideoOwnerTuple>()
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(to_video_with_owner).collect())
}

// ============================================================================
// Per-owner aggregates
// ============================================================================

/// All of an owner's videos, newest first
pub async fn list_by_owner(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Vec<VideoRow>, SqliteError> {
    let rows = sqlx::query_as::<_, VideoTuple>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.owner_id = ? ORDER BY v.created_at DESC, v.rowid DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(to_video_row).collect())
}

pub async fn count_by_owner(pool: &SqlitePool, owner_id: &str) -> Result<u64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE owner_id = ?")
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

    Ok(count as u64)
}

/// Sum of views across an owner's videos, 0 when there are none
pub async fn sum_views_by_owner(pool: &SqlitePool, owner_id: &str) -> Result<u64, SqliteError> {
    let total: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(views), 0) FROM videos WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

    Ok(total as u64)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user;
    use crate::data::sqlite::test_pool;
    use crate::data::types::{SortDirection, VideoSortField};

    pub(crate) fn new_video(owner_id: &str, title: &str) -> NewVideo {
        NewVideo {
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: format!("About {title}"),
            category: "general".to_string(),
            video_file: format!("http://media/{title}.mp4"),
            thumbnail: format!("http://media/{title}.png"),
            duration: 60,
        }
    }

    async fn set_stats(pool: &SqlitePool, id: &str, views: i64, duration: i64) {
        sqlx::query("UPDATE videos SET views = ?, duration = ? WHERE id = ?")
            .bind(views)
            .bind(duration)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let pool = test_pool().await;
        let video = create_video(&pool, &new_video("u1", "intro")).await.unwrap();
        assert!(video.is_published);
        assert_eq!(video.views, 0);

        let patch = VideoPatch {
            title: Some("Intro v2".to_string()),
            ..Default::default()
        };
        let updated = update_video(&pool, &video.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "Intro v2");
        assert_eq!(updated.description, "About intro");

        let untouched = update_video(&pool, &video.id, &VideoPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.updated_at, updated.updated_at);

        assert!(set_published(&pool, &video.id, false).await.unwrap());
        assert!(!get_video(&pool, &video.id).await.unwrap().unwrap().is_published);

        assert!(increment_views(&pool, &video.id).await.unwrap());
        assert_eq!(get_video(&pool, &video.id).await.unwrap().unwrap().views, 1);

        assert!(delete_video(&pool, &video.id).await.unwrap());
        assert!(!delete_video(&pool, &video.id).await.unwrap());
        assert!(update_video(&pool, &video.id, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_feed_filters_and_inner_join() {
        let pool = test_pool().await;
        let owner = user::create_user(&pool, &user::tests::new_user("maker"))
            .await
            .unwrap();

        let cats = create_video(&pool, &new_video(&owner.id, "Cats 100%"))
            .await
            .unwrap();
        let dogs = create_video(&pool, &new_video(&owner.id, "Dogs"))
            .await
            .unwrap();
        // Owner never existed: excluded from count and page
        create_video(&pool, &new_video("ghost", "Cats too")).await.unwrap();

        set_stats(&pool, &cats.id, 50, 30).await;
        set_stats(&pool, &dogs.id, 500, 300).await;

        let all = VideoFeedFilter::default();
        assert_eq!(count_feed(&pool, &all).await.unwrap(), 2);

        let query = VideoFeedFilter {
            query: Some("cATs".to_string()),
            ..Default::default()
        };
        assert_eq!(count_feed(&pool, &query).await.unwrap(), 1);

        let literal_percent = VideoFeedFilter {
            query: Some("100%".to_string()),
            ..Default::default()
        };
        assert_eq!(count_feed(&pool, &literal_percent).await.unwrap(), 1);

        let views = VideoFeedFilter {
            min_views: Some(50),
            max_views: Some(50),
            ..Default::default()
        };
        let page = list_feed(&pool, &views, VideoSort::default(), 0, 10)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].video.id, cats.id);
        let uploader = page[0].owner.as_ref().unwrap();
        assert_eq!(uploader.username, "maker");

        let duration = VideoFeedFilter {
            min_duration: Some(301),
            ..Default::default()
        };
        assert_eq!(count_feed(&pool, &duration).await.unwrap(), 0);

        let unpublished = VideoFeedFilter {
            is_published: Some(false),
            ..Default::default()
        };
        assert_eq!(count_feed(&pool, &unpublished).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_feed_sort_and_window() {
        let pool = test_pool().await;
        let owner = user::create_user(&pool, &user::tests::new_user("sorter"))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for (i, title) in ["b", "c", "a"].iter().enumerate() {
            let v = create_video(&pool, &new_video(&owner.id, title)).await.unwrap();
            set_stats(&pool, &v.id, i as i64 * 10, 1).await;
            ids.push(v.id);
        }

        let by_title = VideoSort {
            field: VideoSortField::Title,
            direction: SortDirection::Asc,
        };
        let page = list_feed(&pool, &VideoFeedFilter::default(), by_title, 0, 10)
            .await
            .unwrap();
        let titles: Vec<_> = page.iter().map(|v| v.video.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);

        let by_views = VideoSort {
            field: VideoSortField::Views,
            direction: SortDirection::Desc,
        };
        let second = list_feed(&pool, &VideoFeedFilter::default(), by_views, 1, 1)
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].video.id, ids[1]);
    }

    #[tokio::test]
    async fn test_owner_aggregates() {
        let pool = test_pool().await;
        assert_eq!(sum_views_by_owner(&pool, "nobody").await.unwrap(), 0);

        let a = create_video(&pool, &new_video("u1", "a")).await.unwrap();
        let b = create_video(&pool, &new_video("u1", "b")).await.unwrap();
        create_video(&pool, &new_video("u2", "c")).await.unwrap();
        set_stats(&pool, &a.id, 7, 1).await;
        set_stats(&pool, &b.id, 5, 1).await;

        assert_eq!(count_by_owner(&pool, "u1").await.unwrap(), 2);
        assert_eq!(sum_views_by_owner(&pool, "u1").await.unwrap(), 12);

        let listed = list_by_owner(&pool, "u1").await.unwrap();
        assert_eq!(listed[0].id, b.id);

        let batch = get_videos_by_ids(&pool, &[a.id.clone(), "gone".to_string()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
    }
}
