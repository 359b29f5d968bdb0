//! Page/limit windowing with total-count metadata
//!
//! A paginated query runs twice: once to count every match and once to fetch
//! the requested window. `WindowedQuery` keeps both passes on one filter value.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

use super::error::DomainError;

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Parse raw query values
    ///
    /// Absent, non-numeric or zero values fall back to the defaults. The limit
    /// is capped at `MAX_PAGE_LIMIT`.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let positive = |raw: Option<&str>| {
            raw.and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|n| *n >= 1)
        };
        let defaults = Self::default();
        Self {
            page: positive(page).unwrap_or(defaults.page),
            limit: positive(limit)
                .unwrap_or(defaults.limit)
                .min(MAX_PAGE_LIMIT),
        }
    }

    pub fn window(&self) -> Window {
        Window {
            offset: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

/// Rows to skip and take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    /// Largest offset the store can address (signed 64-bit)
    pub const MAX_OFFSET: u64 = i64::MAX as u64;

    /// Whether the window starts past any row the store could hold
    pub fn is_out_of_range(&self) -> bool {
        self.offset > Self::MAX_OFFSET
    }
}

/// An ordered query that can be counted and windowed under one filter
#[async_trait]
pub trait WindowedQuery: Send + Sync {
    type Item: Send;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn fetch(&self, window: Window) -> Result<Vec<Self::Item>, DomainError>;
}

/// One page of results plus navigation metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit);
        let has_next_page = request.page < total_pages;
        let has_prev_page = request.page > 1;
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total_items,
            total_pages,
            has_next_page,
            has_prev_page,
            prev_page: has_prev_page.then(|| request.page - 1),
            next_page: has_next_page.then(|| request.page + 1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

/// Count every match, then fetch the requested window
pub async fn paginate<Q: WindowedQuery>(
    query: &Q,
    request: PageRequest,
) -> Result<Page<Q::Item>, DomainError> {
    let total_items = query.count().await?;
    let window = request.window();
    let items = if window.is_out_of_range() {
        tracing::debug!(page = request.page, limit = request.limit, "Page beyond addressable range");
        Vec::new()
    } else {
        query.fetch(window).await?
    };
    Ok(Page::new(items, request, total_items))
}
