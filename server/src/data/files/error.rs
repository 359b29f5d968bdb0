//! Object store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid object URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let err = ObjectStoreError::InvalidUrl("http://x/../etc".to_string());
        assert_eq!(err.to_string(), "Invalid object URL: http://x/../etc");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ObjectStoreError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
