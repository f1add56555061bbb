//! Repository for the `likes` table.
//!
//! The `uq_likes_actor_target` unique index is the at-most-one-like
//! invariant. Toggling inserts first (`ON CONFLICT DO NOTHING`) and only
//! deletes when the insert was a no-op, so two round trips never race
//! into a duplicate row.

use sqlx::PgPool;

use clipstream_core::types::DbId;

use crate::models::like::{LikeTarget, ToggleOutcome};

/// Provides the existence-toggle and count operations for likes.
pub struct LikeRepo;

impl LikeRepo {
    /// Flip the like state for (actor, target). Returns the state the
    /// like ended up in.
    pub async fn toggle(
        pool: &PgPool,
        actor: DbId,
        target: LikeTarget,
    ) -> Result<ToggleOutcome, sqlx::Error> {
        let inserted: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO likes (liked_by, target_type, target_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (liked_by, target_type, target_id) DO NOTHING
             RETURNING id",
        )
        .bind(actor)
        .bind(target.kind())
        .bind(target.id())
        .fetch_optional(pool)
        .await?;

        if inserted.is_some() {
            return Ok(ToggleOutcome::Liked);
        }

        sqlx::query("DELETE FROM likes WHERE liked_by = $1 AND target_type = $2 AND target_id = $3")
            .bind(actor)
            .bind(target.kind())
            .bind(target.id())
            .execute(pool)
            .await?;
        Ok(ToggleOutcome::Unliked)
    }

    /// Whether the actor currently likes the target.
    pub async fn exists(
        pool: &PgPool,
        actor: DbId,
        target: LikeTarget,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE liked_by = $1 AND target_type = $2 AND target_id = $3
            )",
        )
        .bind(actor)
        .bind(target.kind())
        .bind(target.id())
        .fetch_one(pool)
        .await
    }

    /// Like count for a target.
    pub async fn count_for(pool: &PgPool, target: LikeTarget) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE target_type = $1 AND target_id = $2")
            .bind(target.kind())
            .bind(target.id())
            .fetch_one(pool)
            .await
    }
}
