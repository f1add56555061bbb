//! Comment entity model and DTOs.

use clipstream_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full comment row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub owner_id: DbId,
    pub video_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Enriched comment row for listings: owner summary plus like counters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentListItem {
    pub id: DbId,
    pub video_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub owner_id: DbId,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: String,
    pub like_count: i64,
    pub is_liked: bool,
}
