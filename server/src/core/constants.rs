// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "VidHive";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "vidhive";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".vidhive";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "vidhive.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "VIDHIVE_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "VIDHIVE_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "VIDHIVE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "VIDHIVE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "VIDHIVE_LOG";

/// Externally visible base URL, used to build media links
pub const ENV_PUBLIC_URL: &str = "VIDHIVE_PUBLIC_URL";

/// Comma-separated list of allowed CORS origins
pub const ENV_CORS_ORIGIN: &str = "VIDHIVE_CORS_ORIGIN";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Versioned REST prefix
pub const API_PREFIX: &str = "/api/v1";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "VIDHIVE_DATA_DIR";

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the access token signing secret
pub const ENV_ACCESS_TOKEN_SECRET: &str = "VIDHIVE_ACCESS_TOKEN_SECRET";

/// Environment variable for the refresh token signing secret
pub const ENV_REFRESH_TOKEN_SECRET: &str = "VIDHIVE_REFRESH_TOKEN_SECRET";

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Default access token lifetime (1 day)
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Default refresh token lifetime (10 days)
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 10 * 24 * 60 * 60;

// =============================================================================
// Media
// =============================================================================

/// Route under which stored media objects are served
pub const MEDIA_ROUTE_PATH: &str = "/media";

/// Environment variable for the request body limit on uploads
pub const ENV_MAX_UPLOAD_BYTES: &str = "VIDHIVE_MAX_UPLOAD_BYTES";

/// Default request body limit (covers a video file plus its thumbnail)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

// =============================================================================
// Pagination
// =============================================================================

/// Page size when the request does not give one
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Largest page size a request may ask for
pub const MAX_PAGE_LIMIT: u64 = 100;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "vidhive.db";

/// Maximum pool connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// Busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// Page cache size (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between explicit WAL checkpoints
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Shutdown
// =============================================================================

/// Time allowed for background tasks to finish on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
