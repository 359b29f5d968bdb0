//! Shared API types
//!
//! Every response uses one envelope:
//!
//! - success: `{ "success": true, "statusCode", "data", "message" }`
//! - failure: `{ "success": false, "statusCode", "message", "errors" }`

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Convert stored Unix milliseconds to a UTC timestamp
pub fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

/// Success envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub data: T,
    pub message: String,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_status(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            data,
            message: message.into(),
            status,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Failure envelope, as documented in the OpenAPI schema
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub errors: Vec<String>,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String, errors: Vec<String> },
    Unauthorized { message: String },
    Forbidden { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// 400 carrying one message per failed field
    pub fn validation(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: crate::data::DataError) -> Self {
        tracing::error!(error = %e, "Data error");
        Self::internal("Database operation failed")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(message) => Self::bad_request(message),
            DomainError::NotFound(message) => Self::not_found(message),
            DomainError::Forbidden(message) => Self::forbidden(message),
            DomainError::Unauthenticated(message) => Self::unauthorized(message),
            DomainError::Conflict(message) => Self::conflict(message),
            DomainError::Data(e) => Self::from_data(e),
            DomainError::Upstream(e) => {
                tracing::error!(error = %e, "Media storage error");
                Self::internal("Failed to store media file")
            }
            DomainError::Internal(message) => {
                tracing::error!(%message, "Internal error");
                Self::internal(message)
            }
        }
    }
}

impl From<crate::data::DataError> for ApiError {
    fn from(e: crate::data::DataError) -> Self {
        DomainError::from(e).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match self {
            Self::BadRequest { message, errors } => (message, errors),
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Internal { message } => (message, Vec::new()),
        };
        (
            status,
            Json(ErrorBody {
                success: false,
                status_code: status.as_u16(),
                message,
                errors,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = ApiResponse::created(serde_json::json!({ "a": 1 }), "Made").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["statusCode"], 201);
        assert_eq!(json["data"]["a"], 1);
        assert_eq!(json["message"], "Made");
        assert!(json.get("status").is_none());
    }

    #[tokio::test]
    async fn test_unit_data_is_null() {
        let json = body_json(ApiResponse::ok((), "Done").into_response()).await;
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn test_failure_envelope() {
        let response =
            ApiError::validation("Invalid input", vec!["title is required".into()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["message"], "Invalid input");
        assert_eq!(json["errors"][0], "title is required");
    }

    #[test]
    fn test_domain_error_mapping() {
        let cases = [
            (DomainError::validation("v"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("n"), StatusCode::NOT_FOUND),
            (DomainError::forbidden("f"), StatusCode::FORBIDDEN),
            (DomainError::unauthenticated("u"), StatusCode::UNAUTHORIZED),
            (DomainError::conflict("c"), StatusCode::CONFLICT),
            (
                DomainError::Internal("i".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[tokio::test]
    async fn test_data_error_hides_details() {
        let err: ApiError =
            DomainError::Data(crate::data::DataError::Sqlite(sqlx::Error::RowNotFound)).into();
        let json = body_json(err.into_response()).await;
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], "Database operation failed");
    }

    #[test]
    fn test_timestamp_from_millis() {
        assert_eq!(
            timestamp(1_700_000_000_123).to_rfc3339(),
            "2023-11-14T22:13:20.123+00:00"
        );
    }
}
