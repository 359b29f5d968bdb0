//! Caller extractors for Axum handlers
//!
//! Both read the `AuthOutcome` that the `authenticate` middleware stored in
//! request extensions. Put them before path extractors so an anonymous caller
//! gets 401 before any id validation runs.
//!
//! ```ignore
//! pub async fn delete_tweet(
//!     State(state): State<TweetsApiState>,
//!     Auth(caller): Auth,           // 401 unless signed in
//!     tweet: PathId<TweetIdParam>,  // 400 on a malformed id
//! ) -> Result<ApiResponse<()>, ApiError> { .. }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::context::{AuthContext, AuthOutcome};
use crate::api::types::ApiError;

fn outcome(parts: &Parts) -> Result<AuthOutcome, ApiError> {
    parts
        .extensions
        .get::<AuthOutcome>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("Auth outcome missing; authenticate middleware not applied");
            ApiError::internal("Auth context not available")
        })
}

/// Signed-in caller (required)
#[derive(Debug, Clone)]
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match outcome(parts)? {
            AuthOutcome::Authenticated(ctx) => Ok(Self(ctx)),
            AuthOutcome::Anonymous => Err(ApiError::unauthorized("Unauthorized access")),
            AuthOutcome::Invalid(message) => Err(ApiError::unauthorized(message)),
            AuthOutcome::Unavailable => Err(ApiError::internal("Database operation failed")),
        }
    }
}

/// Caller if signed in; absent or invalid tokens read as anonymous
#[derive(Debug, Clone)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl MaybeAuth {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(AuthContext::user_id)
    }
}

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(outcome(parts)?.into_context()))
    }
}
