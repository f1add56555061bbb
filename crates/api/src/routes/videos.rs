//! Route definitions for videos and their nested comments/likes.
//!
//! Mounted at `/videos`. Publishing uploads media, so the body limit is
//! raised well above the axum default.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{comments, likes, videos};
use crate::state::AppState;

/// Body limit for video uploads.
const UPLOAD_BODY_LIMIT: usize = 1024 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/videos",
            get(videos::list)
                .post(videos::publish)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/videos/search", get(videos::search))
        .route(
            "/videos/{id}",
            get(videos::get)
                .patch(videos::update_details)
                .delete(videos::delete),
        )
        .route(
            "/videos/{id}/thumbnail",
            patch(videos::update_thumbnail).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/videos/{id}/publish", patch(videos::toggle_publish))
        .route(
            "/videos/{id}/comments",
            get(comments::list).post(comments::add),
        )
        .route("/videos/{id}/like", post(likes::toggle_video))
}
