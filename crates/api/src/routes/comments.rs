//! Route definitions for comment mutation and likes.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::{comments, likes};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/{id}",
            patch(comments::update).delete(comments::delete),
        )
        .route("/comments/{id}/like", post(likes::toggle_comment))
}
