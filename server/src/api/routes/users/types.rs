//! User API types

use std::borrow::Cow;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::routes::types::UserDto;
use crate::api::types::timestamp;
use crate::domain::views::ChannelProfile;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| {
            Regex::new(r"^[\w-]+(\.[\w-]+)*@([\w-]+\.)+[a-zA-Z]{2,7}$").expect("Invalid regex")
        })
        .is_match(email)
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Trim and lowercase a login identifier; blank reads as absent
pub fn normalize_login(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Requests
// ============================================================================

/// Login with username or email
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_login"))]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn validate_login(req: &LoginRequest) -> Result<(), ValidationError> {
    if is_blank(&req.password) {
        return Err(rule("required", "Password is required"));
    }
    if is_blank(&req.email) && is_blank(&req.username) {
        return Err(rule("required", "Email or username is required"));
    }
    if let Some(email) = req.email.as_deref().map(str::trim)
        && !email.is_empty()
        && !is_valid_email(email)
    {
        return Err(rule("email", "Invalid email format"));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_change_password"))]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

fn validate_change_password(req: &ChangePasswordRequest) -> Result<(), ValidationError> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(rule("required", "Current and new passwords are required"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_account"))]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

fn validate_update_account(req: &UpdateAccountRequest) -> Result<(), ValidationError> {
    if [&req.full_name, &req.username, &req.email]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return Err(rule(
            "required",
            "Full name, username, and email are required",
        ));
    }
    Ok(())
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}

/// Channel profile projection
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfileDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub subscriber_count: u64,
    pub channels_subscribed_to_count: u64,
    pub is_subscribed: bool,
    pub avatar: String,
    pub cover_image: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChannelProfile> for ChannelProfileDto {
    fn from(profile: ChannelProfile) -> Self {
        let user = profile.user;
        Self {
            id: user.id,
            full_name: user.full_name,
            username: user.username,
            subscriber_count: profile.subscriber_count,
            channels_subscribed_to_count: profile.channels_subscribed_to_count,
            is_subscribed: profile.is_subscribed,
            avatar: user.avatar,
            cover_image: user.cover_image,
            email: user.email,
            created_at: timestamp(user.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: Option<&str>, username: Option<&str>, password: Option<&str>) -> LoginRequest {
        LoginRequest {
            email: email.map(str::to_string),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    fn first_message(req: &LoginRequest) -> Option<String> {
        req.validate().err().map(|errors| {
            errors.field_errors()["__all__"][0]
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_default()
        })
    }

    #[test]
    fn test_login_rule_order() {
        assert_eq!(
            first_message(&login(None, None, None)).as_deref(),
            Some("Password is required")
        );
        assert_eq!(
            first_message(&login(Some(" "), None, Some("pw"))).as_deref(),
            Some("Email or username is required")
        );
        assert_eq!(
            first_message(&login(Some("not-an-email"), None, Some("pw"))).as_deref(),
            Some("Invalid email format")
        );
        assert_eq!(first_message(&login(Some("a.b@example.com"), None, Some("pw"))), None);
        assert_eq!(first_message(&login(None, Some("alice"), Some("pw"))), None);
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("first.last@sub.example.io"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b.toolongtld"));
    }

    #[test]
    fn test_update_account_requires_all() {
        let req = UpdateAccountRequest {
            full_name: "A".into(),
            username: " ".into(),
            email: "a@x.io".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_normalize_login() {
        assert_eq!(normalize_login(Some("  Alice ")).as_deref(), Some("alice"));
        assert_eq!(normalize_login(Some("   ")), None);
        assert_eq!(normalize_login(None), None);
    }
}
