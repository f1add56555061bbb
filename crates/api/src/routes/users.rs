//! Route definitions for the current user and per-user listings.

use axum::routing::get;
use axum::Router;

use crate::handlers::{likes, subscriptions, users};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(users::me))
        .route("/users/me/history", get(users::watch_history))
        .route(
            "/users/me/subscriptions",
            get(subscriptions::list_subscribed_channels),
        )
        .route("/users/me/likes/videos", get(likes::liked_videos))
        .route("/users/{username}/posts", get(users::posts_by_username))
}
