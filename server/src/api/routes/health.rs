//! Health check endpoint

use axum::Router;
use axum::routing::get;

use crate::api::types::ApiResponse;

pub fn routes() -> Router<()> {
    Router::new().route("/", get(healthcheck))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/healthcheck",
    tag = "healthcheck",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn healthcheck() -> ApiResponse<()> {
    ApiResponse::ok((), "Server is healthy and running!")
}
