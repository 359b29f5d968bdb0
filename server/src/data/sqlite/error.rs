//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl SqliteError {
    /// Map a UNIQUE violation to `Conflict`, pass anything else through
    pub fn unique_as_conflict(err: sqlx::Error, message: impl Into<String>) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                SqliteError::Conflict(message.into())
            }
            other => SqliteError::Database(other),
        }
    }
}
