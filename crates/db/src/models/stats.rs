//! Channel statistics summary record.

use serde::Serialize;
use sqlx::FromRow;

/// Single-pass aggregate over a channel's videos.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct VideoTotals {
    pub views: i64,
    pub total_duration_secs: f64,
    pub published_videos: i64,
}

/// The merged statistics record for a channel.
///
/// Every metric is optional: a failed sub-query leaves its metric unset
/// and omitted from the response instead of failing the whole call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChannelStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_videos: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribers: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_playlists: Option<i64>,
}
