//! Repository for the `comments` table.

use sqlx::PgPool;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::{Page, PageRequest, PageWindow};
use clipstream_core::sort::SortOrder;
use clipstream_core::types::DbId;

use crate::db_internal;
use crate::models::comment::{Comment, CommentListItem};
use crate::query::ListQuery;

/// Column list for plain comment queries.
const COLUMNS: &str = "id, owner_id, video_id, content, created_at, updated_at";

/// Enriched projection: owner summary plus like counters.
const COMMENT_PROJECTION: &str = "c.id, c.video_id, c.content, c.created_at, \
    c.owner_id, u.username AS owner_username, u.full_name AS owner_full_name, \
    u.avatar_url AS owner_avatar_url, \
    (SELECT COUNT(*) FROM likes l WHERE l.target_type = 'comment' AND l.target_id = c.id) AS like_count, \
    EXISTS(SELECT 1 FROM likes l WHERE l.target_type = 'comment' AND l.target_id = c.id \
        AND l.liked_by = {viewer}) AS is_liked";

const COMMENT_FROM: &str = "comments c JOIN users u ON u.id = c.owner_id";

/// Provides CRUD and listing operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        video_id: DbId,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (owner_id, video_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(owner_id)
            .bind(video_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A video's comments, newest first. Callers must have checked the
    /// video exists and is published.
    pub async fn list_by_video(
        pool: &PgPool,
        video_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<Page<CommentListItem>, CoreError> {
        let query = ListQuery::new(COMMENT_PROJECTION, COMMENT_FROM, 1)
            .filter("c.video_id = $1")
            .order_by("c.created_at", SortOrder::Desc);

        let count_sql = query.count_sql();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(video_id)
            .fetch_one(pool)
            .await
            .map_err(|e| db_internal("count comments", e))?;

        match page.resolve(total)? {
            PageWindow::Empty => Ok(Page::empty()),
            PageWindow::Window {
                offset,
                limit,
                total_pages,
            } => {
                let page_sql = query.page_sql();
                let items = sqlx::query_as::<_, CommentListItem>(&page_sql)
                    .bind(video_id)
                    .bind(viewer)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_internal("list comments", e))?;
                Ok(Page::from_window(items, total, total_pages, page.page()))
            }
        }
    }

    /// Replace the comment text, owner check done by the caller.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET content = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment along with its likes.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM likes WHERE target_type = 'comment' AND target_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
