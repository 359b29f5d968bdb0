//! JWT access and refresh token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::data::types::UserRow;

/// JWT validation error
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("jwt expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("jwt malformed: {0}")]
    Invalid(String),
    #[error("Failed to create JWT: {0}")]
    Encode(String),
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl AccessClaims {
    pub fn new(user: &UserRow, ttl_secs: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs as i64);

        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Claims carried by a refresh token (identity only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl RefreshClaims {
    pub fn new(user_id: &str, ttl_secs: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs as i64);

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Sign claims with HS256
pub fn sign<C: Serialize>(claims: &C, signing_key: &[u8]) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| JwtError::Encode(e.to_string()))
}

/// Validate signature and expiry, then decode the claims
pub fn verify<C: DeserializeOwned>(token: &str, signing_key: &[u8]) -> Result<C, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<C>(token, &DecodingKey::from_secret(signing_key), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Invalid(e.to_string()),
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRow {
        UserRow {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice A".to_string(),
            avatar: "http://x/a.png".to_string(),
            cover_image: String::new(),
            password_hash: String::new(),
            refresh_token_hash: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_access_round_trip() {
        let key = vec![7u8; 32];
        let token = sign(&AccessClaims::new(&user(), 60), &key).unwrap();
        let claims: AccessClaims = verify(&token, &key).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.full_name, "Alice A");
    }

    #[test]
    fn test_invalid_signature() {
        let token = sign(&RefreshClaims::new("u1", 60), &[0u8; 32]).unwrap();
        let err = verify::<RefreshClaims>(&token, &[1u8; 32]).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn test_expired() {
        let key = vec![0u8; 32];
        let now = Utc::now().timestamp();
        let claims = RefreshClaims {
            sub: "u1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign(&claims, &key).unwrap();
        let err = verify::<RefreshClaims>(&token, &key).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_garbage_token() {
        let err = verify::<AccessClaims>("not-a-jwt", &[0u8; 32]).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn test_unique_jti() {
        let c1 = RefreshClaims::new("u1", 60);
        let c2 = RefreshClaims::new("u1", 60);
        assert_ne!(c1.jti, c2.jti);
    }
}
