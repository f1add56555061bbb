//! Channel statistics aggregation.
//!
//! One single-pass query covers the video totals; the remaining metrics
//! are independent queries. All branches run concurrently and are joined
//! all-settled: a failed metric is logged and omitted from the summary,
//! never aborting the response. This is deliberately looser than the
//! fail-fast policy everywhere else.

use axum::extract::{Path, State};
use axum::Json;

use clipstream_core::error::CoreError;
use clipstream_core::types::DbId;
use clipstream_db::models::stats::ChannelStats;
use clipstream_db::repositories::{PlaylistRepo, StatsRepo, SubscriptionRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ensure_valid_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/channels/{id}/stats
pub async fn channel_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(channel_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChannelStats>>> {
    ensure_valid_id(channel_id)?;
    UserRepo::find_by_id(&state.pool, channel_id)
        .await?
        .ok_or_else(|| CoreError::not_found("channel", channel_id))?;

    let pool = &state.pool;
    let (totals, likes, comments, subscribers, public_playlists) = tokio::join!(
        StatsRepo::video_totals(pool, channel_id),
        StatsRepo::total_video_likes(pool, channel_id),
        StatsRepo::total_video_comments(pool, channel_id),
        SubscriptionRepo::count_subscribers(pool, channel_id),
        PlaylistRepo::count_public_by_owner(pool, channel_id),
    );

    let mut stats = ChannelStats::default();

    match totals {
        Ok(totals) => {
            stats.views = Some(totals.views);
            stats.total_duration_secs = Some(totals.total_duration_secs);
            stats.published_videos = Some(totals.published_videos);
        }
        Err(err) => tracing::warn!(channel_id, error = %err, "video totals metric failed"),
    }
    match likes {
        Ok(count) => stats.likes = Some(count),
        Err(err) => tracing::warn!(channel_id, error = %err, "likes metric failed"),
    }
    match comments {
        Ok(count) => stats.comments = Some(count),
        Err(err) => tracing::warn!(channel_id, error = %err, "comments metric failed"),
    }
    match subscribers {
        Ok(count) => stats.subscribers = Some(count),
        Err(err) => tracing::warn!(channel_id, error = %err, "subscribers metric failed"),
    }
    match public_playlists {
        Ok(count) => stats.public_playlists = Some(count),
        Err(err) => tracing::warn!(channel_id, error = %err, "playlists metric failed"),
    }

    Ok(Json(DataResponse::new(stats)))
}
