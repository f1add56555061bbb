//! Handlers for like toggles and the liked-videos listing.
//!
//! A toggle is an existence flip keyed on (actor, target); the storage
//! layer's unique index is the source of truth, so concurrent duplicate
//! toggles cannot produce two rows.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use clipstream_core::error::CoreError;
use clipstream_core::pagination::Page;
use clipstream_core::types::DbId;
use clipstream_db::models::like::{LikeTarget, ToggleOutcome};
use clipstream_db::models::video::VideoListItem;
use clipstream_db::repositories::{CommentRepo, LikeRepo, PostRepo, VideoRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{ensure_valid_id, PageParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a toggle: the state the like ended up in.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub state: ToggleOutcome,
}

/// POST /api/v1/videos/{id}/like
pub async fn toggle_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ToggleResponse>>> {
    ensure_valid_id(video_id)?;
    VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;
    toggle(&state, auth.user_id, LikeTarget::Video(video_id)).await
}

/// POST /api/v1/comments/{id}/like
pub async fn toggle_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ToggleResponse>>> {
    ensure_valid_id(comment_id)?;
    CommentRepo::find_by_id(&state.pool, comment_id)
        .await?
        .ok_or_else(|| CoreError::not_found("comment", comment_id))?;
    toggle(&state, auth.user_id, LikeTarget::Comment(comment_id)).await
}

/// POST /api/v1/posts/{id}/like
pub async fn toggle_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ToggleResponse>>> {
    ensure_valid_id(post_id)?;
    PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or_else(|| CoreError::not_found("post", post_id))?;
    toggle(&state, auth.user_id, LikeTarget::Post(post_id)).await
}

/// GET /api/v1/users/me/likes/videos
///
/// The viewer's liked videos. Likes on since-unpublished videos survive
/// but those videos are filtered out here.
pub async fn liked_videos(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<VideoListItem>>>> {
    let page = params.to_request(&state.config)?;
    let videos = VideoRepo::list_liked(&state.pool, auth.user_id, page).await?;
    Ok(Json(DataResponse::new(videos)))
}

async fn toggle(
    state: &AppState,
    actor: DbId,
    target: LikeTarget,
) -> AppResult<Json<DataResponse<ToggleResponse>>> {
    let outcome = LikeRepo::toggle(&state.pool, actor, target).await?;
    Ok(Json(DataResponse::new(ToggleResponse { state: outcome })))
}
