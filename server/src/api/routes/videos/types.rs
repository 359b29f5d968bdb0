//! Video API types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::data::types::VideoFeedFilter;
use crate::utils::id::is_valid_id;

/// Feed query. Every value arrives as a string and is coerced leniently.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeedQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Substring of title or description
    pub query: Option<String>,
    /// createdAt, updatedAt, views, duration or title
    pub sort_by: Option<String>,
    /// `asc`; anything else sorts descending
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
    pub category: Option<String>,
    /// `"true"` matches published videos, any other value unpublished ones
    pub is_published: Option<String>,
    pub min_views: Option<String>,
    pub max_views: Option<String>,
    pub min_duration: Option<String>,
    pub max_duration: Option<String>,
}

fn int(raw: &Option<String>) -> Option<i64> {
    raw.as_deref().and_then(|v| v.trim().parse().ok())
}

impl FeedQuery {
    pub fn filter(&self) -> VideoFeedFilter {
        VideoFeedFilter {
            query: self.query.clone().filter(|q| !q.is_empty()),
            owner_id: self.user_id.clone().filter(|id| is_valid_id(id)),
            category: self.category.clone().filter(|c| !c.is_empty()),
            is_published: self.is_published.as_deref().map(|v| v == "true"),
            min_views: int(&self.min_views),
            max_views: int(&self.max_views),
            min_duration: int(&self.min_duration),
            max_duration: int(&self.max_duration),
        }
    }
}

/// `{isPublished}` after a publish toggle
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishStateDto {
    pub is_published: bool,
}

/// Duration in whole seconds: probed value rounded up, else the client's, else 0
pub fn resolve_duration(probed: Option<f64>, declared: Option<&str>) -> i64 {
    probed
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| d.ceil() as i64)
        .or_else(|| {
            declared
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.ceil() as i64)
        })
        .unwrap_or(0)
}
