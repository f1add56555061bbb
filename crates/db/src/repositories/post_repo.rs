//! Repository for the `posts` table.
//!
//! Single-post fetch and owner listing share one match predicate
//! (`p.id = $1 OR p.owner_id = $1`), so both lookups run the exact same
//! enrichment pipeline.

use sqlx::PgPool;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::{Page, PageRequest, PageWindow};
use clipstream_core::sort::SortOrder;
use clipstream_core::types::DbId;

use crate::db_internal;
use crate::models::post::{Post, PostListItem};
use crate::query::ListQuery;

/// Column list for plain post queries.
const COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

/// Enriched projection: owner summary, like counters, derived edited flag.
const POST_PROJECTION: &str = "p.id, p.content, p.created_at, \
    (p.created_at <> p.updated_at) AS is_edited, \
    p.owner_id, u.username AS owner_username, u.full_name AS owner_full_name, \
    u.avatar_url AS owner_avatar_url, \
    (SELECT COUNT(*) FROM likes l WHERE l.target_type = 'post' AND l.target_id = p.id) AS like_count, \
    EXISTS(SELECT 1 FROM likes l WHERE l.target_type = 'post' AND l.target_id = p.id \
        AND l.liked_by = {viewer}) AS is_liked";

const POST_FROM: &str = "posts p JOIN users u ON u.id = p.owner_id";

/// Shared match predicate: the bound id may be a post id or an owner id.
const POST_MATCH: &str = "(p.id = $1 OR p.owner_id = $1)";

/// Provides CRUD and listing operations for posts.
pub struct PostRepo;

impl PostRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        content: &str,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (owner_id, content) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(owner_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Single enriched post. Runs the shared match predicate and keeps the
    /// row whose id is the key (the OR also admits rows owned by a user
    /// with that id).
    pub async fn find_item(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<PostListItem>, sqlx::Error> {
        let projection = POST_PROJECTION.replace("{viewer}", "$2");
        let query = format!("SELECT {projection} FROM {POST_FROM} WHERE {POST_MATCH}");
        let rows = sqlx::query_as::<_, PostListItem>(&query)
            .bind(id)
            .bind(viewer)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().find(|post| post.id == id))
    }

    /// A user's posts, newest first, through the same match predicate as
    /// the single-post fetch.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        viewer: Option<DbId>,
        page: PageRequest,
    ) -> Result<Page<PostListItem>, CoreError> {
        let query = ListQuery::new(POST_PROJECTION, POST_FROM, 1)
            .filter(POST_MATCH)
            .order_by("p.created_at", SortOrder::Desc);

        let count_sql = query.count_sql();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(owner_id)
            .fetch_one(pool)
            .await
            .map_err(|e| db_internal("count posts", e))?;

        match page.resolve(total)? {
            PageWindow::Empty => Ok(Page::empty()),
            PageWindow::Window {
                offset,
                limit,
                total_pages,
            } => {
                let page_sql = query.page_sql();
                let items = sqlx::query_as::<_, PostListItem>(&page_sql)
                    .bind(owner_id)
                    .bind(viewer)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_internal("list posts", e))?;
                Ok(Page::from_window(items, total, total_pages, page.page()))
            }
        }
    }

    /// Replace the post text (bumps `updated_at`, which flips the derived
    /// edited flag). Owner check done by the caller.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET content = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post along with its likes.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM likes WHERE target_type = 'post' AND target_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
