//! API server initialization

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::auth::{AuthManager, AuthState, authenticate};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{
    comments, dashboard, health, likes, playlists, subscriptions, tweets, users, videos,
};
use crate::core::CoreApp;
use crate::core::config::AppConfig;
use crate::core::constants::{API_PREFIX, MEDIA_ROUTE_PATH};
use crate::core::storage::DataSubdir;
use crate::data::{ObjectStore, TransactionalService};

/// Everything the router needs from the running application
struct RouterDeps {
    database: Arc<TransactionalService>,
    media: Arc<dyn ObjectStore>,
    auth: Arc<AuthManager>,
    media_dir: PathBuf,
}

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let router = build_router(
            &app.config,
            RouterDeps {
                database: app.database.clone(),
                media: app.media.clone(),
                auth: app.auth.clone(),
                media_dir: app.storage.subdir(DataSubdir::Media),
            },
        );

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            address = %addr,
            public_url = %app.config.server.public_url,
            "Server listening"
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

fn build_router(config: &AppConfig, deps: RouterDeps) -> Router {
    let RouterDeps {
        database,
        media,
        auth,
        media_dir,
    } = deps;

    let allowed_origins = AllowedOrigins::new(&config.cors);

    // Resource groups share one auth layer; each handler decides whether a caller is required
    let api_routes = Router::new()
        .nest(
            "/users",
            users::routes(database.clone(), media.clone(), auth.clone()),
        )
        .nest("/videos", videos::routes(database.clone(), media))
        .nest("/comments", comments::routes(database.clone()))
        .nest("/tweets", tweets::routes(database.clone()))
        .nest("/likes", likes::routes(database.clone()))
        .nest("/subscriptions", subscriptions::routes(database.clone()))
        .nest("/playlists", playlists::routes(database.clone()))
        .nest("/dashboard", dashboard::routes(database.clone()))
        .layer(axum::middleware::from_fn_with_state(
            AuthState {
                auth_manager: auth,
                database,
            },
            authenticate,
        ))
        .nest("/healthcheck", health::routes());

    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .nest(API_PREFIX, api_routes)
        .nest_service(MEDIA_ROUTE_PATH, ServeDir::new(media_dir))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(&allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.media.max_upload_bytes))
}
