//! Playlist entity model and DTOs.

use clipstream_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full playlist row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Playlist row enriched with owner summary and membership size, the
/// projection used by owner listings and title search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistListItem {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub owner_id: DbId,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: String,
    pub video_count: i64,
}

/// DTO for creating a playlist. Playlists start private.
#[derive(Debug, Deserialize)]
pub struct CreatePlaylist {
    pub title: String,
    pub description: String,
}

/// DTO for partial detail updates.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlaylistDetails {
    pub title: Option<String>,
    pub description: Option<String>,
}
