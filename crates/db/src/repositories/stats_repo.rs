//! Channel-statistics queries.
//!
//! Each metric is its own query so the aggregator can run them
//! concurrently and degrade per metric. Subscriber and playlist counts
//! live with their own repositories; this one covers the video-derived
//! metrics.

use sqlx::PgPool;

use clipstream_core::types::DbId;

use crate::models::stats::VideoTotals;

pub struct StatsRepo;

impl StatsRepo {
    /// Single pass over a channel's videos: total views, total content
    /// duration, published count.
    pub async fn video_totals(pool: &PgPool, owner_id: DbId) -> Result<VideoTotals, sqlx::Error> {
        sqlx::query_as::<_, VideoTotals>(
            "SELECT COALESCE(SUM(views), 0)::BIGINT AS views,
                    COALESCE(SUM(duration_secs), 0) AS total_duration_secs,
                    COUNT(*) FILTER (WHERE is_published) AS published_videos
             FROM videos WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Total likes across all of the channel's videos.
    pub async fn total_video_likes(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM likes l
             JOIN videos v ON v.id = l.target_id
             WHERE l.target_type = 'video' AND v.owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Total comments across all of the channel's videos.
    pub async fn total_video_comments(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments c
             JOIN videos v ON v.id = c.video_id
             WHERE v.owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }
}
