//! Repository for the `playlists` and `playlist_videos` tables.
//!
//! Playlist membership is an explicitly ordered list, so the detail
//! endpoint pages over the membership itself: slice the position order
//! first, then fetch and visibility-filter the sliced videos. That is
//! deliberately not the standard listing pipeline -- the total counts raw
//! membership, and a window may come back short after filtering.

use sqlx::PgPool;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::{Page, PageRequest, PageWindow};
use clipstream_core::search::contains_pattern;
use clipstream_core::sort::SortOrder;
use clipstream_core::types::DbId;

use crate::db_internal;
use crate::models::playlist::{CreatePlaylist, Playlist, PlaylistListItem, UpdatePlaylistDetails};
use crate::models::video::VideoListItem;
use crate::query::ListQuery;
use crate::repositories::video_repo::VIDEO_PROJECTION;

/// Column list for plain playlist queries.
const COLUMNS: &str = "id, owner_id, title, description, is_public, created_at, updated_at";

/// Enriched projection: owner summary plus membership size.
const PLAYLIST_PROJECTION: &str = "p.id, p.title, p.description, p.is_public, p.created_at, \
    p.owner_id, u.username AS owner_username, u.full_name AS owner_full_name, \
    u.avatar_url AS owner_avatar_url, \
    (SELECT COUNT(*) FROM playlist_videos pv WHERE pv.playlist_id = p.id) AS video_count";

const PLAYLIST_FROM: &str = "playlists p JOIN users u ON u.id = p.owner_id";

/// Provides CRUD, listing, and membership operations for playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    /// Insert a playlist. Playlists start private.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreatePlaylist,
    ) -> Result<Playlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO playlists (owner_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's playlists, newest first. Private playlists appear only
    /// when the accessor is the owner.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<Page<PlaylistListItem>, CoreError> {
        let mut query =
            ListQuery::new(PLAYLIST_PROJECTION, PLAYLIST_FROM, 1).filter("p.owner_id = $1");
        if viewer != Some(owner_id) {
            query = query.filter("p.is_public = TRUE");
        }
        let query = query.order_by("p.created_at", SortOrder::Desc);
        Self::fetch_page(pool, &query, owner_id, page).await
    }

    /// Case-insensitive literal substring search on titles. Always
    /// restricted to public playlists.
    pub async fn search_by_title(
        pool: &PgPool,
        term: &str,
        page: PageRequest,
    ) -> Result<Page<PlaylistListItem>, CoreError> {
        let query = ListQuery::new(PLAYLIST_PROJECTION, PLAYLIST_FROM, 1)
            .filter("p.is_public = TRUE")
            .filter("p.title ILIKE $1 ESCAPE '\\'")
            .order_by("p.created_at", SortOrder::Desc);

        let count_sql = query.count_sql();
        let pattern = contains_pattern(term);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .fetch_one(pool)
            .await
            .map_err(|e| db_internal("count playlists", e))?;

        match page.resolve(total)? {
            PageWindow::Empty => Ok(Page::empty()),
            PageWindow::Window {
                offset,
                limit,
                total_pages,
            } => {
                let page_sql = query.page_sql();
                let items = sqlx::query_as::<_, PlaylistListItem>(&page_sql)
                    .bind(&pattern)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_internal("search playlists", e))?;
                Ok(Page::from_window(items, total, total_pages, page.page()))
            }
        }
    }

    /// One page of a playlist's videos in membership order.
    ///
    /// The window slices the raw membership; visibility filtering
    /// (published, or owned by the viewer) applies to the sliced rows, so
    /// the envelope total always reflects full membership.
    pub async fn membership_page(
        pool: &PgPool,
        playlist_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<Page<VideoListItem>, CoreError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM playlist_videos WHERE playlist_id = $1")
                .bind(playlist_id)
                .fetch_one(pool)
                .await
                .map_err(|e| db_internal("count playlist videos", e))?;

        match page.resolve(total)? {
            PageWindow::Empty => Ok(Page::empty()),
            PageWindow::Window {
                offset,
                limit,
                total_pages,
            } => {
                let projection = VIDEO_PROJECTION.replace("{viewer}", "$2");
                let query = format!(
                    "SELECT {projection} FROM (
                        SELECT video_id, position FROM playlist_videos
                        WHERE playlist_id = $1
                        ORDER BY position
                        LIMIT $3 OFFSET $4
                     ) pv
                     JOIN videos v ON v.id = pv.video_id
                     JOIN users u ON u.id = v.owner_id
                     WHERE (v.is_published = TRUE OR v.owner_id = $2)
                     ORDER BY pv.position"
                );
                let items = sqlx::query_as::<_, VideoListItem>(&query)
                    .bind(playlist_id)
                    .bind(viewer)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_internal("list playlist videos", e))?;
                Ok(Page::from_window(items, total, total_pages, page.page()))
            }
        }
    }

    /// Partial update of title/description, owner check done by the caller.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlaylistDetails,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "UPDATE playlists SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Flip the public/private flag.
    pub async fn toggle_visibility(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "UPDATE playlists SET is_public = NOT is_public, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a video at the tail of the membership order. Returns `false`
    /// when the video is already in the playlist.
    pub async fn add_video(
        pool: &PgPool,
        playlist_id: DbId,
        video_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO playlist_videos (playlist_id, video_id, position)
             SELECT $1, $2, COALESCE(MAX(position) + 1, 0)
             FROM playlist_videos WHERE playlist_id = $1
             ON CONFLICT (playlist_id, video_id) DO NOTHING",
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a video from the membership. Later positions keep their
    /// values; ordering only ever compares, so gaps are harmless.
    pub async fn remove_video(
        pool: &PgPool,
        playlist_id: DbId,
        video_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
                .bind(playlist_id)
                .bind(video_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a playlist; membership rows go with it via FK cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count of a channel's public playlists (statistics metric).
    pub async fn count_public_by_owner(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM playlists WHERE owner_id = $1 AND is_public = TRUE",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Shared count → resolve → fetch flow for playlist listings keyed on
    /// a single id parameter.
    async fn fetch_page(
        pool: &PgPool,
        query: &ListQuery,
        key: DbId,
        page: PageRequest,
    ) -> Result<Page<PlaylistListItem>, CoreError> {
        let count_sql = query.count_sql();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(key)
            .fetch_one(pool)
            .await
            .map_err(|e| db_internal("count playlists", e))?;

        match page.resolve(total)? {
            PageWindow::Empty => Ok(Page::empty()),
            PageWindow::Window {
                offset,
                limit,
                total_pages,
            } => {
                let page_sql = query.page_sql();
                let items = sqlx::query_as::<_, PlaylistListItem>(&page_sql)
                    .bind(key)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_internal("list playlists", e))?;
                Ok(Page::from_window(items, total, total_pages, page.page()))
            }
        }
    }
}
