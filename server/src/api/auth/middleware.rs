//! Authentication middleware

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use super::context::{AuthContext, AuthOutcome};
use super::manager::AuthManager;
use crate::core::constants::ACCESS_TOKEN_COOKIE;
use crate::data::TransactionalService;

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
    pub database: Arc<TransactionalService>,
}

/// Resolve the caller for every request
///
/// Reads the `accessToken` cookie, falling back to `Authorization: Bearer`.
/// Never rejects by itself: the outcome is stored in request extensions and
/// the `Auth` / `MaybeAuth` extractors enforce it per route.
pub async fn authenticate(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = resolve(&state, &jar, request.headers()).await;
    request.extensions_mut().insert(outcome);
    next.run(request).await
}

async fn resolve(state: &AuthState, jar: &CookieJar, headers: &HeaderMap) -> AuthOutcome {
    let Some(token) = access_token(jar, headers) else {
        return AuthOutcome::Anonymous;
    };

    let claims = match state.auth_manager.validate_access(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Access token rejected");
            return AuthOutcome::Invalid(e.to_string());
        }
    };

    match state.database.repository().get_user(&claims.sub).await {
        Ok(Some(user)) => AuthOutcome::Authenticated(AuthContext { user }),
        Ok(None) => AuthOutcome::Invalid("Invalid Access Token".to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load user for access token");
            AuthOutcome::Unavailable
        }
    }
}

fn access_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn test_cookie_takes_precedence() {
        let jar = CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, "from-cookie"));
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(access_token(&jar, &headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(access_token(&CookieJar::new(), &headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(access_token(&CookieJar::new(), &headers), None);
    }
}
