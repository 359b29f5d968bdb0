//! Domain error taxonomy

use thiserror::Error;

use crate::data::{DataError, ObjectStoreError};

#[derive(Error, Debug)]
pub enum DomainError {
    /// Input rejected before any store access
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Caller is authenticated but does not own the record
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Data(DataError),

    #[error("Media storage failed: {0}")]
    Upstream(#[from] ObjectStoreError),

    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<DataError> for DomainError {
    /// Unique-index rejections surface as conflicts; everything else is internal
    fn from(e: DataError) -> Self {
        match e {
            DataError::Conflict(message) => Self::Conflict(message),
            other => Self::Data(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_conflict_becomes_domain_conflict() {
        let err: DomainError = DataError::Conflict("taken".to_string()).into();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "taken"));
    }

    #[test]
    fn test_data_error_stays_internal() {
        let err: DomainError = DataError::Sqlite(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, DomainError::Data(_)));
    }

    #[test]
    fn test_display_is_message() {
        assert_eq!(
            DomainError::not_found("Video not found").to_string(),
            "Video not found"
        );
    }
}
