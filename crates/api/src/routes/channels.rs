//! Route definitions for channel-scoped resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{playlists, stats, subscriptions, videos};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/channels/{id}/videos", get(videos::list_by_channel))
        .route("/channels/{id}/stats", get(stats::channel_stats))
        .route(
            "/channels/{id}/subscribers",
            get(subscriptions::list_subscribers),
        )
        .route("/channels/{id}/subscription", post(subscriptions::toggle))
        .route(
            "/channels/{id}/playlists",
            get(playlists::list_by_channel),
        )
}
