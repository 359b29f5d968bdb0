//! User API endpoints: registration, sessions, profile and channel views

pub mod types;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, Path, State};
use axum::routing::{get, patch, post};
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};

use crate::api::auth::{Auth, AuthManager, MaybeAuth, TokenPair};
use crate::api::extractors::ValidatedJson;
use crate::api::routes::types::{HistoryVideoDto, UserDto};
use crate::api::types::{ApiError, ApiResponse};
use crate::api::upload::{self, MediaKind, UploadForm};
use crate::core::constants::REFRESH_TOKEN_COOKIE;
use crate::data::files::MediaFolder;
use crate::data::types::{NewUser, UserRow};
use crate::data::{ObjectStore, TransactionalService};
use crate::domain::DomainError;
use crate::domain::credentials::{
    change_password as replace_password, hash_credential, verify_credential,
};
use crate::domain::views::{channel_profile, watch_history};

use types::{
    ChangePasswordRequest, ChannelProfileDto, LoginRequest, LoginResponse, RefreshTokenRequest,
    UpdateAccountRequest, normalize_login,
};

/// Shared state for User API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub database: Arc<TransactionalService>,
    pub media: Arc<dyn ObjectStore>,
    pub auth: Arc<AuthManager>,
}

/// Build User API routes
pub fn routes(
    database: Arc<TransactionalService>,
    media: Arc<dyn ObjectStore>,
    auth: Arc<AuthManager>,
) -> Router<()> {
    let state = UsersApiState {
        database,
        media,
        auth,
    };

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .route("/change-password", post(change_password))
        .route("/current-user", get(current_user))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover_image))
        .route("/c/{username}", get(get_channel_profile))
        .route("/history", get(get_watch_history))
        .with_state(state)
}

/// Issue a token pair and persist the refresh fingerprint
async fn start_session(
    state: &UsersApiState,
    user: &UserRow,
) -> Result<TokenPair, ApiError> {
    let tokens = state.auth.issue_tokens(user).map_err(|e| {
        tracing::error!(error = %e, user_id = %user.id, "Token signing failed");
        ApiError::internal("Internal server error while generating tokens")
    })?;

    state
        .database
        .repository()
        .set_refresh_token_hash(&user.id, Some(&tokens.refresh_fingerprint()))
        .await
        .map_err(ApiError::from_data)?;

    Ok(tokens)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body(content_type = "multipart/form-data", description = "fullName, email, username, password, avatar (file), coverImage (optional file)"),
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Missing fields or avatar", body = crate::api::types::ErrorBody),
        (status = 409, description = "Username or email taken", body = crate::api::types::ErrorBody)
    )
)]
pub async fn register(
    State(state): State<UsersApiState>,
    multipart: Multipart,
) -> Result<ApiResponse<UserDto>, ApiError> {
    let mut form = UploadForm::parse(multipart).await?;

    let (Some(full_name), Some(email), Some(username), Some(password)) = (
        form.text("fullName").map(str::to_string),
        normalize_login(form.text("email")),
        normalize_login(form.text("username")),
        form.text("password").map(str::to_string),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    let repo = state.database.repository();
    if repo
        .find_user_by_login(Some(&username), Some(&email))
        .await
        .map_err(ApiError::from_data)?
        .is_some()
    {
        return Err(ApiError::conflict("User with email or username already exists"));
    }

    let avatar = form
        .take_file("avatar", MediaKind::Image)?
        .ok_or_else(|| ApiError::bad_request("Avatar file is required"))?;
    let cover = form.take_file("coverImage", MediaKind::Image)?;

    let password_hash = hash_credential(&password)?;

    let avatar = upload::store(state.media.as_ref(), MediaFolder::Avatars, avatar).await?;
    let cover_url = match cover {
        Some(cover) => {
            match upload::store(state.media.as_ref(), MediaFolder::CoverImages, cover).await {
                Ok(stored) => stored.url,
                Err(e) => {
                    upload::discard(state.media.as_ref(), &avatar.url).await;
                    return Err(e);
                }
            }
        }
        None => String::new(),
    };

    let new_user = NewUser {
        username,
        email,
        full_name,
        avatar: avatar.url.clone(),
        cover_image: cover_url.clone(),
        password_hash,
    };

    let user = match repo.create_user(&new_user).await {
        Ok(user) => user,
        Err(e) => {
            upload::discard(state.media.as_ref(), &avatar.url).await;
            upload::discard(state.media.as_ref(), &cover_url).await;
            return Err(match DomainError::from(e) {
                DomainError::Conflict(_) => {
                    ApiError::conflict("User with email or username already exists")
                }
                other => other.into(),
            });
        }
    };

    tracing::debug!(user_id = %user.id, username = %user.username, "User registered");
    Ok(ApiResponse::created(
        UserDto::from(user),
        "User registered Successfully",
    ))
}

/// Login with username or email
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookies set", body = LoginResponse),
        (status = 400, description = "Invalid input", body = crate::api::types::ErrorBody),
        (status = 401, description = "Incorrect password", body = crate::api::types::ErrorBody),
        (status = 404, description = "User not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<UsersApiState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<LoginResponse>), ApiError> {
    let username = normalize_login(req.username.as_deref());
    let email = normalize_login(req.email.as_deref());
    let password = req.password.unwrap_or_default();

    let repo = state.database.repository();
    let user = repo
        .find_user_by_login(username.as_deref(), email.as_deref())
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_credential(repo.as_ref(), &user.id, &password).await? {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    let tokens = start_session(&state, &user).await?;
    let jar = state.auth.set_session_cookies(jar, &tokens);

    tracing::debug!(user_id = %user.id, "User logged in");
    Ok((
        jar,
        ApiResponse::ok(
            LoginResponse {
                user: UserDto::from(user),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}

/// Logout: unset the stored refresh fingerprint and clear cookies
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    tag = "users",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Not signed in", body = crate::api::types::ErrorBody)
    )
)]
pub async fn logout(
    State(state): State<UsersApiState>,
    Auth(caller): Auth,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    state
        .database
        .repository()
        .set_refresh_token_hash(caller.user_id(), None)
        .await
        .map_err(ApiError::from_data)?;

    Ok((
        state.auth.clear_session_cookies(jar),
        ApiResponse::ok(json!({}), "User logged out successfully"),
    ))
}

/// Rotate the session from a refresh token (cookie or body)
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    tag = "users",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Missing, invalid or reused refresh token", body = crate::api::types::ErrorBody)
    )
)]
pub async fn refresh_token(
    State(state): State<UsersApiState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<(CookieJar, ApiResponse<TokenPair>), ApiError> {
    let incoming = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized access"))?;

    let claims = state
        .auth
        .validate_refresh(&incoming)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let user = state
        .database
        .repository()
        .get_user(&claims.sub)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::unauthorized("Invalid Refresh Token"))?;

    if !AuthManager::refresh_matches(&incoming, user.refresh_token_hash.as_deref()) {
        tracing::debug!(user_id = %user.id, "Refresh token reuse rejected");
        return Err(ApiError::unauthorized("Refresh token is expired or used"));
    }

    let tokens = start_session(&state, &user).await?;
    let jar = state.auth.set_session_cookies(jar, &tokens);

    Ok((
        jar,
        ApiResponse::ok(tokens, "Access token refreshed successfully"),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/change-password",
    tag = "users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Missing fields", body = crate::api::types::ErrorBody),
        (status = 401, description = "Current password is incorrect", body = crate::api::types::ErrorBody)
    )
)]
pub async fn change_password(
    State(state): State<UsersApiState>,
    Auth(caller): Auth,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    replace_password(
        state.database.repository().as_ref(),
        caller.user_id(),
        &req.current_password,
        &req.new_password,
    )
    .await?;

    Ok(ApiResponse::ok(json!({}), "Password changed successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    tag = "users",
    responses(
        (status = 200, description = "The signed-in user", body = UserDto),
        (status = 401, description = "Not signed in", body = crate::api::types::ErrorBody)
    )
)]
pub async fn current_user(Auth(caller): Auth) -> ApiResponse<UserDto> {
    ApiResponse::ok(
        UserDto::from(caller.user),
        "Current user fetched successfully",
    )
}

/// Update full name, username and email
#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    tag = "users",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = UserDto),
        (status = 400, description = "Missing fields", body = crate::api::types::ErrorBody),
        (status = 409, description = "Username or email taken", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_account(
    State(state): State<UsersApiState>,
    Auth(caller): Auth,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<ApiResponse<UserDto>, ApiError> {
    let user = state
        .database
        .repository()
        .update_user_account(
            caller.user_id(),
            req.full_name.trim(),
            &req.username.trim().to_lowercase(),
            &req.email.trim().to_lowercase(),
        )
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::ok(
        UserDto::from(user),
        "Account details updated successfully",
    ))
}

/// Which user image an upload replaces
#[derive(Clone, Copy)]
enum ProfileImage {
    Avatar,
    CoverImage,
}

impl ProfileImage {
    fn field(self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::CoverImage => "coverImage",
        }
    }

    fn folder(self) -> MediaFolder {
        match self {
            Self::Avatar => MediaFolder::Avatars,
            Self::CoverImage => MediaFolder::CoverImages,
        }
    }

    fn current(self, user: &UserRow) -> &str {
        match self {
            Self::Avatar => &user.avatar,
            Self::CoverImage => &user.cover_image,
        }
    }
}

async fn replace_profile_image(
    state: &UsersApiState,
    caller: &UserRow,
    multipart: Multipart,
    image: ProfileImage,
    missing: &'static str,
) -> Result<UserRow, ApiError> {
    let mut form = UploadForm::parse(multipart).await?;
    let file = form
        .take_file(image.field(), MediaKind::Image)?
        .ok_or_else(|| ApiError::bad_request(missing))?;

    let stored = upload::store(state.media.as_ref(), image.folder(), file).await?;

    let repo = state.database.repository();
    let updated = match image {
        ProfileImage::Avatar => repo.update_user_avatar(&caller.id, &stored.url).await,
        ProfileImage::CoverImage => repo.update_user_cover_image(&caller.id, &stored.url).await,
    };

    match updated {
        Ok(Some(user)) => {
            upload::discard(state.media.as_ref(), image.current(caller)).await;
            Ok(user)
        }
        Ok(None) => {
            upload::discard(state.media.as_ref(), &stored.url).await;
            Err(ApiError::not_found("User not found"))
        }
        Err(e) => {
            upload::discard(state.media.as_ref(), &stored.url).await;
            Err(ApiError::from_data(e))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/avatar",
    tag = "users",
    request_body(content_type = "multipart/form-data", description = "avatar (image file)"),
    responses(
        (status = 200, description = "Avatar replaced", body = UserDto),
        (status = 400, description = "Avatar file is required", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_avatar(
    State(state): State<UsersApiState>,
    Auth(caller): Auth,
    multipart: Multipart,
) -> Result<ApiResponse<UserDto>, ApiError> {
    let user = replace_profile_image(
        &state,
        &caller.user,
        multipart,
        ProfileImage::Avatar,
        "Avatar file is required",
    )
    .await?;

    Ok(ApiResponse::ok(
        UserDto::from(user),
        "Avatar updated successfully",
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/cover-image",
    tag = "users",
    request_body(content_type = "multipart/form-data", description = "coverImage (image file)"),
    responses(
        (status = 200, description = "Cover image replaced", body = UserDto),
        (status = 400, description = "Cover image file is required", body = crate::api::types::ErrorBody)
    )
)]
pub async fn update_cover_image(
    State(state): State<UsersApiState>,
    Auth(caller): Auth,
    multipart: Multipart,
) -> Result<ApiResponse<UserDto>, ApiError> {
    let user = replace_profile_image(
        &state,
        &caller.user,
        multipart,
        ProfileImage::CoverImage,
        "Cover image file is required",
    )
    .await?;

    Ok(ApiResponse::ok(
        UserDto::from(user),
        "Cover image updated successfully",
    ))
}

/// Channel profile by username; `isSubscribed` reflects the caller if signed in
#[utoipa::path(
    get,
    path = "/api/v1/users/c/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Channel username (case-insensitive)")),
    responses(
        (status = 200, description = "Channel profile", body = ChannelProfileDto),
        (status = 404, description = "Channel does not exist", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_channel_profile(
    State(state): State<UsersApiState>,
    caller: MaybeAuth,
    Path(username): Path<String>,
) -> Result<ApiResponse<ChannelProfileDto>, ApiError> {
    let profile = channel_profile(
        state.database.repository().as_ref(),
        &username,
        caller.user_id(),
    )
    .await?;

    Ok(ApiResponse::ok(
        ChannelProfileDto::from(profile),
        "User channel profile fetched successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/history",
    tag = "users",
    responses(
        (status = 200, description = "Watched videos in order", body = Vec<HistoryVideoDto>),
        (status = 401, description = "Not signed in", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_watch_history(
    State(state): State<UsersApiState>,
    Auth(caller): Auth,
) -> Result<ApiResponse<Vec<HistoryVideoDto>>, ApiError> {
    let history = watch_history(state.database.repository().as_ref(), caller.user_id()).await?;

    Ok(ApiResponse::ok(
        history
            .into_iter()
            .map(|entry| HistoryVideoDto::new(entry.video, entry.owner))
            .collect(),
        "Watch history fetched successfully",
    ))
}
