//! Path and validation extractors for API routes
//!
//! Every rejection renders the standard failure envelope with status 400.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use super::types::ApiError;
use crate::utils::id::is_valid_id;

// ============================================================================
// Record Id Path Extractors
// ============================================================================

/// Marker trait naming one record-id path parameter
pub trait IdParam: Send + Sync + 'static {
    /// Path parameter name as written in the route
    const PARAM: &'static str;
    /// Message returned when the id is malformed
    const INVALID: &'static str;
}

macro_rules! id_param {
    ($name:ident, $param:literal, $invalid:literal) => {
        pub struct $name;
        impl IdParam for $name {
            const PARAM: &'static str = $param;
            const INVALID: &'static str = $invalid;
        }
    };
}

id_param!(VideoIdParam, "videoId", "Invalid video ID");
id_param!(CommentIdParam, "commentId", "Invalid Comment ID");
id_param!(TweetIdParam, "tweetId", "Invalid Tweet ID");
id_param!(ChannelIdParam, "channelId", "Invalid channel ID");
id_param!(SubscriberIdParam, "subscriberId", "Invalid subscriber ID");
id_param!(UserIdParam, "userId", "Invalid user ID");
id_param!(PlaylistIdParam, "playlistId", "Invalid Playlist ID");

/// Validated record id taken from the path parameter named by `K`
pub struct PathId<K: IdParam> {
    pub id: String,
    _kind: PhantomData<K>,
}

impl<K: IdParam> Deref for PathId<K> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.id
    }
}

impl<S, K> FromRequestParts<S> for PathId<K>
where
    S: Send + Sync,
    K: IdParam,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        let id = params
            .remove(K::PARAM)
            .filter(|id| is_valid_id(id))
            .ok_or(ValidationRejection::InvalidId(K::INVALID))?;

        Ok(Self {
            id,
            _kind: PhantomData,
        })
    }
}

/// Validated `playlistId` + `videoId` pair
#[derive(Debug)]
pub struct PlaylistVideoPath {
    pub playlist_id: String,
    pub video_id: String,
}

impl<S> FromRequestParts<S> for PlaylistVideoPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        match (params.remove("playlistId"), params.remove("videoId")) {
            (Some(playlist_id), Some(video_id))
                if is_valid_id(&playlist_id) && is_valid_id(&video_id) =>
            {
                Ok(Self {
                    playlist_id,
                    video_id,
                })
            }
            _ => Err(ValidationRejection::InvalidId("Invalid Playlist or Video ID")),
        }
    }
}

// ============================================================================
// Rejection
// ============================================================================

/// Validation rejection with structured error response
#[derive(Debug)]
pub enum ValidationRejection {
    /// Failed to parse path parameters
    Path(PathRejection),
    /// Malformed record id
    InvalidId(&'static str),
    /// Failed to parse query string
    Query(QueryRejection),
    /// Failed to parse JSON body
    Json(JsonRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl From<ValidationRejection> for ApiError {
    fn from(rejection: ValidationRejection) -> Self {
        match rejection {
            ValidationRejection::Path(r) => ApiError::bad_request(r.body_text()),
            ValidationRejection::InvalidId(message) => ApiError::bad_request(message),
            ValidationRejection::Query(r) => ApiError::bad_request(r.body_text()),
            ValidationRejection::Json(r) => ApiError::bad_request(r.body_text()),
            ValidationRejection::Validation(errors) => {
                let messages = validation_messages(&errors);
                ApiError::validation(messages.join("; "), messages)
            }
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// One message per failed rule, ordered by field name
fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect()
}

/// Validator rule: value must contain a non-whitespace character
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Validated Query / JSON
// ============================================================================

/// Query extractor with automatic validation.
///
/// Deserializes query parameters and validates them using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Query)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

/// JSON body extractor with automatic validation.
///
/// Deserializes JSON body and validates it using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Body1 {
        #[serde(default)]
        #[validate(custom(function = "not_blank", message = "Content is required"))]
        content: String,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/videos/{videoId}",
                get(|id: PathId<VideoIdParam>| async move { id.id.clone() }),
            )
            .route(
                "/playlists/{playlistId}/videos/{videoId}",
                get(|p: PlaylistVideoPath| async move { format!("{}:{}", p.playlist_id, p.video_id) }),
            )
            .route(
                "/echo",
                post(|body: ValidatedJson<Body1>| async move { body.content.clone() }),
            )
    }

    async fn send(request: axum::http::Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_path_id_accepts_valid() {
        let (status, body) = send(get_req("/videos/abc123")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "abc123");
    }

    #[tokio::test]
    async fn test_path_id_rejects_malformed() {
        let (status, body) = send(get_req("/videos/bad%20id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid video ID");
    }

    #[tokio::test]
    async fn test_playlist_video_path() {
        let (status, body) = send(get_req("/playlists/p1/videos/v1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "p1:v1");

        let (status, body) = send(get_req("/playlists/p1/videos/v%21")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid Playlist or Video ID"));
    }

    #[tokio::test]
    async fn test_validated_json_blank_field() {
        let request = axum::http::Request::post("/echo")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"content":"   "}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "Content is required");
        assert_eq!(json["errors"][0], "Content is required");
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank(" \t").is_err());
    }
}
