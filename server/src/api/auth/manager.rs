//! Authentication manager

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

use super::jwt::{AccessClaims, JwtError, RefreshClaims, sign, verify};
use crate::core::AuthConfig;
use crate::core::constants::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::data::types::UserRow;
use crate::utils::crypto;

/// Freshly issued access + refresh tokens
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Value stored on the user record in place of the refresh token
    pub fn refresh_fingerprint(&self) -> String {
        crypto::sha256_hex(&self.refresh_token)
    }
}

/// Main authentication manager
pub struct AuthManager {
    access_key: Vec<u8>,
    refresh_key: Vec<u8>,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
    secure_cookies: bool,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Build signing keys from config. A missing secret gets a random key for this process.
    pub fn new(config: &AuthConfig) -> Self {
        let key_for = |secret: Option<&String>, name: &str| match secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "No {} secret configured; using a random key (tokens will not survive a restart)",
                    name
                );
                crypto::generate_signing_key()
            }
        };

        let access_key = key_for(config.access_token_secret.as_ref(), "access token");
        let refresh_key = key_for(config.refresh_token_secret.as_ref(), "refresh token");

        tracing::debug!(
            access_ttl_secs = config.access_token_ttl_secs,
            refresh_ttl_secs = config.refresh_token_ttl_secs,
            secure_cookies = config.secure_cookies,
            "Authentication initialized"
        );

        Self {
            access_key,
            refresh_key,
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
            secure_cookies: config.secure_cookies,
        }
    }

    /// Sign a new access/refresh pair for the user
    pub fn issue_tokens(&self, user: &UserRow) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: sign(
                &AccessClaims::new(user, self.access_ttl_secs),
                &self.access_key,
            )?,
            refresh_token: sign(
                &RefreshClaims::new(&user.id, self.refresh_ttl_secs),
                &self.refresh_key,
            )?,
        })
    }

    pub fn validate_access(&self, token: &str) -> Result<AccessClaims, JwtError> {
        verify(token, &self.access_key)
    }

    pub fn validate_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        verify(token, &self.refresh_key)
    }

    /// Whether `token` is the refresh token whose fingerprint is stored
    pub fn refresh_matches(token: &str, stored: Option<&str>) -> bool {
        stored.is_some_and(|stored| crypto::constant_time_eq(&crypto::sha256_hex(token), stored))
    }

    /// Add both session cookies to the jar
    pub fn set_session_cookies(&self, jar: CookieJar, tokens: &TokenPair) -> CookieJar {
        jar.add(self.cookie(
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            self.access_ttl_secs,
        ))
        .add(self.cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
            self.refresh_ttl_secs,
        ))
    }

    /// Expire both session cookies
    pub fn clear_session_cookies(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
            .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"))
    }

    fn cookie(&self, name: &'static str, value: String, ttl_secs: u64) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(ttl_secs as i64))
            .build()
    }
}
