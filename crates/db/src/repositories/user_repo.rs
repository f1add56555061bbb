//! Repository for the `users` table and per-user watch history.

use sqlx::PgPool;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::{Page, PageRequest, PageWindow};
use clipstream_core::sort::SortOrder;
use clipstream_core::types::DbId;

use crate::db_internal;
use crate::models::user::{CreateUser, User};
use crate::models::video::VideoListItem;
use crate::query::ListQuery;
use crate::repositories::video_repo::VIDEO_PROJECTION;

/// Column list for users queries.
const COLUMNS: &str = "id, username, full_name, email, password_hash, avatar_url, \
    cover_image_url, refresh_token_hash, created_at, updated_at";

/// Provides account CRUD and watch-history operations.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. Duplicate username/email surfaces as a unique
    /// violation on `uq_users_username` / `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, full_name, email, password_hash, avatar_url, cover_image_url)
             VALUES (lower($1), $2, lower($3), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.avatar_url)
            .bind(&input.cover_image_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Login lookup: the identifier may be a username or an email.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE username = lower($1) OR email = lower($1)"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Store (or clear) the hash of the user's current refresh token.
    pub async fn set_refresh_token_hash(
        pool: &PgPool,
        id: DbId,
        hash: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET refresh_token_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Refresh lookup: match the stored hash of a presented refresh token.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE refresh_token_hash = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Record a view in the watch history. Set semantics: a repeat view
    /// only refreshes `watched_at`.
    pub async fn upsert_watch_history(
        pool: &PgPool,
        user_id: DbId,
        video_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO watch_history (user_id, video_id) VALUES ($1, $2)
             ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()",
        )
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// The user's watch history as enriched videos, most recent first.
    /// Videos that have since been unpublished stay visible only to their
    /// owner.
    pub async fn list_watch_history(
        pool: &PgPool,
        user_id: DbId,
        page: PageRequest,
    ) -> Result<Page<VideoListItem>, CoreError> {
        let from = "watch_history h \
             JOIN videos v ON v.id = h.video_id \
             JOIN users u ON u.id = v.owner_id";
        let query = ListQuery::new(VIDEO_PROJECTION, from, 1)
            .filter("h.user_id = $1")
            .filter("(v.is_published = TRUE OR v.owner_id = $1)")
            .order_by("h.watched_at", SortOrder::Desc);

        let count_sql = query.count_sql();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(|e| db_internal("count watch history", e))?;

        match page.resolve(total)? {
            PageWindow::Empty => Ok(Page::empty()),
            PageWindow::Window {
                offset,
                limit,
                total_pages,
            } => {
                let page_sql = query.page_sql();
                let items = sqlx::query_as::<_, VideoListItem>(&page_sql)
                    .bind(user_id)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| db_internal("list watch history", e))?;
                Ok(Page::from_window(items, total, total_pages, page.page()))
            }
        }
    }
}
