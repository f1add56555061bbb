//! Post entity model and DTOs.

use clipstream_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full post row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub owner_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Enriched post row: owner summary, like counters, and the derived
/// edited flag (`created_at <> updated_at`). The flag is computed in the
/// projection, never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostListItem {
    pub id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub is_edited: bool,
    pub owner_id: DbId,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: String,
    pub like_count: i64,
    pub is_liked: bool,
}
