//! Route definitions for authentication.
//!
//! Mounted at `/auth`. Registration is multipart (profile media), so the
//! body limit is raised above the axum default.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Body limit for registration uploads (avatar + cover image).
const REGISTER_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/register",
            post(auth::register).layer(DefaultBodyLimit::max(REGISTER_BODY_LIMIT)),
        )
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
}
