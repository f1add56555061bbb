//! Shared query parameter types for API handlers.
//!
//! Parsing is the validation point: pagination bounds, sort keys, and sort
//! order are all checked here, before any repository call runs. The
//! structs are kept flat (no `serde(flatten)`) because axum's query
//! deserializer does not round-trip flattened numeric fields.

use serde::Deserialize;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::PageRequest;
use clipstream_core::sort::{SortOrder, VideoSortKey};
use clipstream_core::types::{is_valid_id, DbId};

use crate::config::ServerConfig;
use crate::error::AppResult;

/// Reject malformed entity ids before any query executes.
pub fn ensure_valid_id(id: DbId) -> AppResult<()> {
    if !is_valid_id(id) {
        return Err(CoreError::Validation(format!("invalid id: {id}")).into());
    }
    Ok(())
}

fn page_request(
    page: Option<i64>,
    limit: Option<i64>,
    config: &ServerConfig,
) -> AppResult<PageRequest> {
    let request = PageRequest::with_max(
        page.unwrap_or(1),
        limit.unwrap_or(config.default_page_size),
        config.max_page_size,
    )?;
    Ok(request)
}

fn video_sort(
    sort_by: Option<&str>,
    order: Option<&str>,
) -> AppResult<(VideoSortKey, SortOrder)> {
    let key = VideoSortKey::parse_optional(sort_by)?;
    let order = SortOrder::parse_optional(order)?;
    Ok((key, order))
}

/// Generic pagination parameters (`?page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Validate against the configured bounds, applying defaults.
    pub fn to_request(&self, config: &ServerConfig) -> AppResult<PageRequest> {
        page_request(self.page, self.limit, config)
    }
}

/// Pagination + sort parameters for video listings
/// (`?page=&limit=&sort_by=&order=`).
#[derive(Debug, Default, Deserialize)]
pub struct VideoListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl VideoListParams {
    pub fn to_request(&self, config: &ServerConfig) -> AppResult<PageRequest> {
        page_request(self.page, self.limit, config)
    }

    pub fn to_sort(&self) -> AppResult<(VideoSortKey, SortOrder)> {
        video_sort(self.sort_by.as_deref(), self.order.as_deref())
    }
}

/// Video search parameters: a required term plus listing parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl SearchParams {
    pub fn to_request(&self, config: &ServerConfig) -> AppResult<PageRequest> {
        page_request(self.page, self.limit, config)
    }

    pub fn to_sort(&self) -> AppResult<(VideoSortKey, SortOrder)> {
        video_sort(self.sort_by.as_deref(), self.order.as_deref())
    }
}

/// Playlist search parameters (`?q=&page=&limit=`).
#[derive(Debug, Deserialize)]
pub struct PlaylistSearchParams {
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PlaylistSearchParams {
    pub fn to_request(&self, config: &ServerConfig) -> AppResult<PageRequest> {
        page_request(self.page, self.limit, config)
    }
}
