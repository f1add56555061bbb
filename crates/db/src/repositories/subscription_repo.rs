//! Repository for the `subscriptions` table.

use sqlx::PgPool;

use clipstream_core::types::DbId;

use crate::models::user::UserSummary;

/// Provides the subscription toggle and the two membership listings.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Flip the subscription state for (subscriber, channel). Returns
    /// `true` when the toggle ends subscribed. The subscriber ≠ channel
    /// rule is enforced by the caller (and re-enforced by the table CHECK).
    pub async fn toggle(
        pool: &PgPool,
        subscriber: DbId,
        channel: DbId,
    ) -> Result<bool, sqlx::Error> {
        let inserted: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO subscriptions (subscriber_id, channel_id)
             VALUES ($1, $2)
             ON CONFLICT (subscriber_id, channel_id) DO NOTHING
             RETURNING id",
        )
        .bind(subscriber)
        .bind(channel)
        .fetch_optional(pool)
        .await?;

        if inserted.is_some() {
            return Ok(true);
        }

        sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
            .bind(subscriber)
            .bind(channel)
            .execute(pool)
            .await?;
        Ok(false)
    }

    /// Public summaries of everyone subscribed to a channel.
    pub async fn list_subscribers(
        pool: &PgPool,
        channel: DbId,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.username, u.full_name, u.avatar_url
             FROM subscriptions s
             JOIN users u ON u.id = s.subscriber_id
             WHERE s.channel_id = $1
             ORDER BY s.created_at DESC",
        )
        .bind(channel)
        .fetch_all(pool)
        .await
    }

    /// Public summaries of every channel a user subscribes to.
    pub async fn list_subscribed_channels(
        pool: &PgPool,
        subscriber: DbId,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.username, u.full_name, u.avatar_url
             FROM subscriptions s
             JOIN users u ON u.id = s.channel_id
             WHERE s.subscriber_id = $1
             ORDER BY s.created_at DESC",
        )
        .bind(subscriber)
        .fetch_all(pool)
        .await
    }

    /// Subscriber count for a channel.
    pub async fn count_subscribers(pool: &PgPool, channel: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
            .bind(channel)
            .fetch_one(pool)
            .await
    }
}
