//! Repository for the `videos` table.
//!
//! Listing queries all go through [`ListQuery`] with the shared
//! [`VIDEO_PROJECTION`], so every video listing carries the same owner
//! summary and derived counters and pages with the same count/window
//! contract.

use sqlx::PgPool;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::{Page, PageRequest, PageWindow};
use clipstream_core::search::contains_pattern;
use clipstream_core::sort::{SortOrder, VideoSortKey};
use clipstream_core::types::DbId;

use crate::db_internal;
use crate::models::video::{CreateVideo, UpdateVideoDetails, Video, VideoListItem};
use crate::query::ListQuery;

/// Raw column list for plain `videos` queries.
const COLUMNS: &str = "id, owner_id, video_url, video_public_id, thumbnail_url, \
    thumbnail_public_id, title, description, duration_secs, views, is_published, \
    created_at, updated_at";

/// Enriched projection for listings: fixed allow-list plus owner summary
/// and derived counters. `{viewer}` is the accessing user's id (nullable).
pub const VIDEO_PROJECTION: &str = "v.id, v.title, v.description, v.video_url, \
    v.thumbnail_url, v.duration_secs, v.views, v.is_published, v.created_at, \
    v.owner_id, u.username AS owner_username, u.full_name AS owner_full_name, \
    u.avatar_url AS owner_avatar_url, \
    (SELECT COUNT(*) FROM likes l WHERE l.target_type = 'video' AND l.target_id = v.id) AS like_count, \
    (SELECT COUNT(*) FROM comments c WHERE c.video_id = v.id) AS comment_count, \
    EXISTS(SELECT 1 FROM likes l WHERE l.target_type = 'video' AND l.target_id = v.id \
        AND l.liked_by = {viewer}) AS is_liked";

/// Base FROM clause for enriched video queries (owner join).
pub const VIDEO_FROM: &str = "videos v JOIN users u ON u.id = v.owner_id";

/// Provides CRUD, listing, and cascade operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a freshly uploaded video. Videos are published on creation.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (owner_id, video_url, video_public_id, thumbnail_url,
                thumbnail_public_id, title, description, duration_secs)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.owner_id)
            .bind(&input.video_url)
            .bind(&input.video_public_id)
            .bind(&input.thumbnail_url)
            .bind(&input.thumbnail_public_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.duration_secs)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Single enriched video for the detail endpoint.
    pub async fn find_item(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<VideoListItem>, sqlx::Error> {
        let projection = VIDEO_PROJECTION.replace("{viewer}", "$2");
        let query = format!("SELECT {projection} FROM {VIDEO_FROM} WHERE v.id = $1");
        sqlx::query_as::<_, VideoListItem>(&query)
            .bind(id)
            .bind(viewer)
            .fetch_optional(pool)
            .await
    }

    /// Public catalog: published videos only.
    pub async fn list_published(
        pool: &PgPool,
        viewer: Option<DbId>,
        sort: VideoSortKey,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<VideoListItem>, CoreError> {
        let query = ListQuery::new(VIDEO_PROJECTION, VIDEO_FROM, 0)
            .filter("v.is_published = TRUE")
            .order_by(sort.as_sql(), order);
        Self::fetch_page(pool, &query, &[], viewer, page).await
    }

    /// A channel's videos. The owner also sees unpublished ones.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        viewer: Option<DbId>,
        sort: VideoSortKey,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<VideoListItem>, CoreError> {
        let mut query = ListQuery::new(VIDEO_PROJECTION, VIDEO_FROM, 1).filter("v.owner_id = $1");
        if viewer != Some(owner_id) {
            query = query.filter("v.is_published = TRUE");
        }
        let query = query.order_by(sort.as_sql(), order);
        Self::fetch_page(pool, &query, &[Bind::Id(owner_id)], viewer, page).await
    }

    /// Case-insensitive literal substring search on titles, published only.
    pub async fn search_by_title(
        pool: &PgPool,
        term: &str,
        viewer: Option<DbId>,
        sort: VideoSortKey,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<VideoListItem>, CoreError> {
        let query = ListQuery::new(VIDEO_PROJECTION, VIDEO_FROM, 1)
            .filter("v.is_published = TRUE")
            .filter("v.title ILIKE $1 ESCAPE '\\'")
            .order_by(sort.as_sql(), order);
        let pattern = contains_pattern(term);
        Self::fetch_page(pool, &query, &[Bind::Text(pattern)], viewer, page).await
    }

    /// Videos the viewer has liked. A like on a since-unpublished video is
    /// kept but the video is filtered out of this listing.
    pub async fn list_liked(
        pool: &PgPool,
        viewer: DbId,
        page: PageRequest,
    ) -> Result<Page<VideoListItem>, CoreError> {
        let from = "likes lk \
             JOIN videos v ON v.id = lk.target_id \
             JOIN users u ON u.id = v.owner_id";
        let query = ListQuery::new(VIDEO_PROJECTION, from, 1)
            .filter("lk.target_type = 'video'")
            .filter("lk.liked_by = $1")
            .filter("v.is_published = TRUE")
            .order_by("lk.created_at", SortOrder::Desc);
        Self::fetch_page(pool, &query, &[Bind::Id(viewer)], Some(viewer), page).await
    }

    /// Partial update of title/description, owner check done by the caller.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideoDetails,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Swap the thumbnail reference after a successful upload.
    pub async fn update_thumbnail(
        pool: &PgPool,
        id: DbId,
        thumbnail_url: &str,
        thumbnail_public_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET thumbnail_url = $2, thumbnail_public_id = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(thumbnail_url)
            .bind(thumbnail_public_id)
            .fetch_optional(pool)
            .await
    }

    /// Flip the publish flag.
    pub async fn toggle_publish(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET is_published = NOT is_published, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count a view. Monotonic: only ever increments.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a video and everything hanging off it: likes on the video,
    /// likes on its comments, then the row itself (comments, playlist
    /// membership, and watch history go with it via FK cascade). Returns
    /// the deleted row so the caller can release stored media.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM likes WHERE target_type = 'comment'
             AND target_id IN (SELECT id FROM comments WHERE video_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM likes WHERE target_type = 'video' AND target_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let query = format!("DELETE FROM videos WHERE id = $1 RETURNING {COLUMNS}");
        let deleted = sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted)
    }

    /// Shared count → resolve → fetch flow for enriched video listings.
    async fn fetch_page(
        pool: &PgPool,
        query: &ListQuery,
        binds: &[Bind],
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<Page<VideoListItem>, CoreError> {
        let count_sql = query.count_sql();
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in binds {
            count = match bind {
                Bind::Id(id) => count.bind(*id),
                Bind::Text(text) => count.bind(text.clone()),
            };
        }
        let total = count
            .fetch_one(pool)
            .await
            .map_err(|e| db_internal("count videos", e))?;

        match page.resolve(total)? {
            PageWindow::Empty => Ok(Page::empty()),
            PageWindow::Window {
                offset,
                limit,
                total_pages,
            } => {
                let page_sql = query.page_sql();
                let mut rows = sqlx::query_as::<_, VideoListItem>(&page_sql);
                for bind in binds {
                    rows = match bind {
                        Bind::Id(id) => rows.bind(*id),
                        Bind::Text(text) => rows.bind(text.clone()),
                    };
                }
                let items = rows
                    .bind(viewer)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_internal("list videos", e))?;
                Ok(Page::from_window(items, total, total_pages, page.page()))
            }
        }
    }
}

/// Predicate bind values for the shared listing flow.
enum Bind {
    Id(DbId),
    Text(String),
}
