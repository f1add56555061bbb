//! Route definitions for posts.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{likes, posts};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(posts::create))
        .route(
            "/posts/{id}",
            get(posts::get).patch(posts::update).delete(posts::delete),
        )
        .route("/posts/{id}/like", post(likes::toggle_post))
}
