//! Unified error type for the data layer

use thiserror::Error;

use crate::data::sqlite::SqliteError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    /// Unique constraint rejected a write
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<SqliteError> for DataError {
    fn from(e: SqliteError) -> Self {
        match e {
            SqliteError::Database(e) => Self::Sqlite(e),
            SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                version,
                name,
                error,
            },
            SqliteError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sqlite_conflict() {
        let err: DataError = SqliteError::Conflict("taken".to_string()).into();
        assert!(matches!(err, DataError::Conflict(ref m) if m == "taken"));
    }

    #[test]
    fn test_from_sqlite_migration() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 2,
            name: "unique_toggle_relations".to_string(),
            error: "boom".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Migration 2 (unique_toggle_relations) failed: boom"
        );
    }

    #[test]
    fn test_from_sqlite_database() {
        let err: DataError = SqliteError::Database(sqlx::Error::RowNotFound).into();
        assert!(err.to_string().starts_with("SQLite error:"));
    }
}
