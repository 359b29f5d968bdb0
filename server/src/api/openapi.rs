//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::auth::TokenPair;
use crate::api::routes::types::{
    AuthorDto, FeedVideoDto, HistoryVideoDto, UploaderDto, UserDto, VideoDto, VideoFields,
    VideoWithOwnerDto,
};
use crate::api::routes::{
    comments, dashboard, health, likes, playlists, subscriptions, tweets, users, videos,
};
use crate::api::types::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VidHive API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Video sharing platform backend"
    ),
    tags(
        (name = "healthcheck", description = "Liveness probe"),
        (name = "users", description = "Accounts, sessions and channel profiles"),
        (name = "videos", description = "Video publishing and the public feed"),
        (name = "comments", description = "Comments on videos"),
        (name = "tweets", description = "Short text posts"),
        (name = "likes", description = "Likes on videos, comments and tweets"),
        (name = "subscriptions", description = "Channel subscriptions"),
        (name = "playlists", description = "Ordered video collections"),
        (name = "dashboard", description = "Channel statistics for the signed-in user")
    ),
    paths(
        // Health
        health::healthcheck,
        // Users
        users::register,
        users::login,
        users::logout,
        users::refresh_token,
        users::change_password,
        users::current_user,
        users::update_account,
        users::update_avatar,
        users::update_cover_image,
        users::get_channel_profile,
        users::get_watch_history,
        // Videos
        videos::list_videos,
        videos::publish_video,
        videos::get_video,
        videos::update_video,
        videos::delete_video,
        videos::toggle_publish,
        // Comments
        comments::list_comments,
        comments::add_comment,
        comments::update_comment,
        comments::delete_comment,
        // Tweets
        tweets::create_tweet,
        tweets::list_user_tweets,
        tweets::update_tweet,
        tweets::delete_tweet,
        // Likes
        likes::toggle_video_like,
        likes::toggle_comment_like,
        likes::toggle_tweet_like,
        likes::list_liked_videos,
        // Subscriptions
        subscriptions::toggle_channel_subscription,
        subscriptions::list_channel_subscribers,
        subscriptions::list_subscribed_channels,
        // Playlists
        playlists::create_playlist,
        playlists::list_user_playlists,
        playlists::get_playlist,
        playlists::update_playlist,
        playlists::delete_playlist,
        playlists::add_video,
        playlists::remove_video,
        // Dashboard
        dashboard::get_channel_stats,
        dashboard::get_channel_videos,
    ),
    components(schemas(
        ErrorBody,
        TokenPair,
        // Shared shapes
        UserDto,
        UploaderDto,
        AuthorDto,
        VideoFields,
        VideoDto,
        VideoWithOwnerDto,
        FeedVideoDto,
        HistoryVideoDto,
        // Users
        users::types::LoginRequest,
        users::types::LoginResponse,
        users::types::RefreshTokenRequest,
        users::types::ChangePasswordRequest,
        users::types::UpdateAccountRequest,
        users::types::ChannelProfileDto,
        // Videos
        videos::types::PublishStateDto,
        // Comments
        comments::types::AddCommentRequest,
        comments::types::UpdateCommentRequest,
        comments::types::CommentDto,
        comments::types::CommentOwnerDto,
        comments::types::CommentListItemDto,
        // Tweets
        tweets::types::CreateTweetRequest,
        tweets::types::UpdateTweetRequest,
        tweets::types::TweetDto,
        tweets::types::UserTweetDto,
        // Likes
        likes::types::LikeDto,
        likes::types::LikedVideoDto,
        // Subscriptions
        subscriptions::types::ContactDto,
        subscriptions::types::SubscriberEntryDto,
        subscriptions::types::ChannelEntryDto,
        // Playlists
        playlists::types::CreatePlaylistRequest,
        playlists::types::UpdatePlaylistRequest,
        playlists::types::PlaylistFields,
        playlists::types::PlaylistDto,
        playlists::types::PopulatedPlaylistDto,
        // Dashboard
        dashboard::ChannelStatsDto,
    ))
)]
pub struct ApiDoc;

/// Serve the OpenAPI JSON document
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>VidHive API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for prefix in [
            "/api/v1/healthcheck",
            "/api/v1/users/register",
            "/api/v1/videos",
            "/api/v1/comments/{videoId}",
            "/api/v1/tweets",
            "/api/v1/likes/videos",
            "/api/v1/subscriptions/c/{channelId}",
            "/api/v1/playlists",
            "/api/v1/dashboard/stats",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == prefix),
                "missing path {prefix}"
            );
        }
    }
}
