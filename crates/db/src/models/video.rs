//! Video entity model and DTOs.

use clipstream_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full video row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub owner_id: DbId,
    pub video_url: String,
    pub video_public_id: String,
    pub thumbnail_url: String,
    pub thumbnail_public_id: String,
    pub title: String,
    pub description: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Enriched video row produced by the listing query: the fixed projection
/// plus owner summary and derived counters. This is the wire shape for
/// every video listing and the single-video detail response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoListItem {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub owner_id: DbId,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
}

/// DTO for inserting a published video. Media is already uploaded.
#[derive(Debug, Deserialize)]
pub struct CreateVideo {
    pub owner_id: DbId,
    pub video_url: String,
    pub video_public_id: String,
    pub thumbnail_url: String,
    pub thumbnail_public_id: String,
    pub title: String,
    pub description: String,
    pub duration_secs: f64,
}

/// DTO for partial detail updates. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVideoDetails {
    pub title: Option<String>,
    pub description: Option<String>,
}
