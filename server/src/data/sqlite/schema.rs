//! SQLite schema definitions
//!
//! Fresh databases get the full schema at `SCHEMA_VERSION`. Older databases are
//! brought forward by the versioned migrations in `migrations.rs`.
//!
//! Content tables reference users and videos by id without foreign keys, so a
//! record can outlive the user or video it points at. Read views decide how to
//! treat such rows.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE CHECK(length(username) >= 1),
    email TEXT NOT NULL UNIQUE CHECK(length(email) >= 3),
    full_name TEXT NOT NULL CHECK(length(full_name) >= 1),
    avatar TEXT NOT NULL CHECK(length(avatar) >= 1),
    cover_image TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,
    refresh_token_hash TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Ordered list of watched videos per user
CREATE TABLE IF NOT EXISTS watch_history (
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    video_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (user_id, video_id)
);

CREATE INDEX IF NOT EXISTS idx_watch_history_position ON watch_history(user_id, position);

-- =============================================================================
-- 2. Videos
-- =============================================================================
CREATE TABLE IF NOT EXISTS videos (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT '',
    video_file TEXT NOT NULL,
    thumbnail TEXT NOT NULL,
    duration INTEGER NOT NULL DEFAULT 0 CHECK(duration >= 0),
    views INTEGER NOT NULL DEFAULT 0 CHECK(views >= 0),
    is_published INTEGER NOT NULL DEFAULT 1 CHECK(is_published IN (0, 1)),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_videos_owner ON videos(owner_id);
CREATE INDEX IF NOT EXISTS idx_videos_created ON videos(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_videos_category ON videos(category);

-- =============================================================================
-- 3. Comments
-- =============================================================================
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    video_id TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    content TEXT NOT NULL CHECK(length(content) >= 1),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_video ON comments(video_id, created_at DESC);

-- =============================================================================
-- 4. Tweets
-- =============================================================================
CREATE TABLE IF NOT EXISTS tweets (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    content TEXT NOT NULL CHECK(length(content) >= 1),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tweets_owner ON tweets(owner_id, created_at DESC);

-- =============================================================================
-- 5. Likes (exactly one target per row)
-- =============================================================================
CREATE TABLE IF NOT EXISTS likes (
    id TEXT PRIMARY KEY,
    liked_by TEXT NOT NULL,
    video_id TEXT,
    comment_id TEXT,
    tweet_id TEXT,
    created_at INTEGER NOT NULL,
    CHECK(
        (video_id IS NOT NULL) + (comment_id IS NOT NULL) + (tweet_id IS NOT NULL) = 1
    )
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_video_unique ON likes(liked_by, video_id) WHERE video_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_comment_unique ON likes(liked_by, comment_id) WHERE comment_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_tweet_unique ON likes(liked_by, tweet_id) WHERE tweet_id IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_likes_liked_by ON likes(liked_by, created_at DESC);

-- =============================================================================
-- 6. Subscriptions
-- =============================================================================
CREATE TABLE IF NOT EXISTS subscriptions (
    id TEXT PRIMARY KEY,
    subscriber_id TEXT NOT NULL,
    channel_id TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    CHECK(subscriber_id != channel_id)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_subscriptions_unique ON subscriptions(subscriber_id, channel_id);
CREATE INDEX IF NOT EXISTS idx_subscriptions_channel ON subscriptions(channel_id);

-- =============================================================================
-- 7. Playlists
-- =============================================================================
CREATE TABLE IF NOT EXISTS playlists (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    description TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(owner_id, name)
);

-- Ordered, duplicate-free video list per playlist
CREATE TABLE IF NOT EXISTS playlist_videos (
    playlist_id TEXT NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
    video_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (playlist_id, video_id)
);

CREATE INDEX IF NOT EXISTS idx_playlist_videos_position ON playlist_videos(playlist_id, position);
"#;

/// Version 2: enforce one like per (user, target) and one subscription per
/// (subscriber, channel). Duplicates left by version 1 are collapsed to the
/// oldest row before the unique indexes are created.
pub const MIGRATION_V2: &str = r#"
DELETE FROM likes WHERE video_id IS NOT NULL AND rowid NOT IN (
    SELECT MIN(rowid) FROM likes WHERE video_id IS NOT NULL GROUP BY liked_by, video_id
);
DELETE FROM likes WHERE comment_id IS NOT NULL AND rowid NOT IN (
    SELECT MIN(rowid) FROM likes WHERE comment_id IS NOT NULL GROUP BY liked_by, comment_id
);
DELETE FROM likes WHERE tweet_id IS NOT NULL AND rowid NOT IN (
    SELECT MIN(rowid) FROM likes WHERE tweet_id IS NOT NULL GROUP BY liked_by, tweet_id
);
DELETE FROM subscriptions WHERE rowid NOT IN (
    SELECT MIN(rowid) FROM subscriptions GROUP BY subscriber_id, channel_id
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_video_unique ON likes(liked_by, video_id) WHERE video_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_comment_unique ON likes(liked_by, comment_id) WHERE comment_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_tweet_unique ON likes(liked_by, tweet_id) WHERE tweet_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_subscriptions_unique ON subscriptions(subscriber_id, channel_id)
"#;
