//! Handlers for the current user's profile and per-user listings.

use axum::extract::{Path, Query, State};
use axum::Json;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::Page;
use clipstream_db::models::post::PostListItem;
use clipstream_db::models::user::UserProfile;
use clipstream_db::models::video::VideoListItem;
use clipstream_db::repositories::{PostRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("user", auth.user_id))?;
    Ok(Json(DataResponse::new(UserProfile::from(user))))
}

/// GET /api/v1/users/me/history
///
/// The viewer's watch history as enriched videos, most recent first.
pub async fn watch_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<VideoListItem>>>> {
    let page = params.to_request(&state.config)?;
    let videos = UserRepo::list_watch_history(&state.pool, auth.user_id, page).await?;
    Ok(Json(DataResponse::new(videos)))
}

/// GET /api/v1/users/{username}/posts
///
/// Posts are addressed by username; the owner id lookup happens first and
/// a missing user is a 404 regardless of pagination.
pub async fn posts_by_username(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<PostListItem>>>> {
    let page = params.to_request(&state.config)?;
    let owner = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| CoreError::not_found_key("user", username))?;

    let posts = PostRepo::list_by_owner(&state.pool, owner.id, viewer.user_id(), page).await?;
    Ok(Json(DataResponse::new(posts)))
}
