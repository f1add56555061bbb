//! Route definitions for playlists and their membership.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::playlists;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/playlists", post(playlists::create))
        .route("/playlists/search", get(playlists::search))
        .route(
            "/playlists/{id}",
            get(playlists::get)
                .patch(playlists::update)
                .delete(playlists::delete),
        )
        .route(
            "/playlists/{id}/visibility",
            patch(playlists::toggle_visibility),
        )
        .route(
            "/playlists/{id}/videos/{video_id}",
            post(playlists::add_video).delete(playlists::remove_video),
        )
}
