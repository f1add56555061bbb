//! Handlers for video comments.
//!
//! Comments exist only on published videos; update and delete require
//! ownership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use clipstream_core::content::{validate_text, MAX_COMMENT_LEN};
use clipstream_core::error::CoreError;
use clipstream_core::pagination::Page;
use clipstream_core::types::DbId;
use clipstream_db::models::comment::{Comment, CommentListItem};
use clipstream_db::repositories::{CommentRepo, VideoRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::{ensure_valid_id, PageParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for adding or editing a comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// GET /api/v1/videos/{id}/comments
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(video_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<CommentListItem>>>> {
    let page = params.to_request(&state.config)?;
    require_published_video(&state, video_id).await?;

    let comments = CommentRepo::list_by_video(&state.pool, video_id, viewer.user_id(), page).await?;
    Ok(Json(DataResponse::new(comments)))
}

/// POST /api/v1/videos/{id}/comments
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let content = validate_text("comment", &input.content, MAX_COMMENT_LEN)?;
    require_published_video(&state, video_id).await?;

    let comment = CommentRepo::create(&state.pool, auth.user_id, video_id, &content).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(comment))))
}

/// PATCH /api/v1/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<Json<DataResponse<Comment>>> {
    let content = validate_text("comment", &input.content, MAX_COMMENT_LEN)?;
    require_owned(&state, comment_id, auth.user_id).await?;

    let comment = CommentRepo::update_content(&state.pool, comment_id, &content)
        .await?
        .ok_or_else(|| CoreError::not_found("comment", comment_id))?;
    Ok(Json(DataResponse::new(comment)))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_owned(&state, comment_id, auth.user_id).await?;
    CommentRepo::delete(&state.pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Comments hang off published videos only; anything else is a 404.
async fn require_published_video(state: &AppState, video_id: DbId) -> AppResult<()> {
    ensure_valid_id(video_id)?;
    let video = VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;
    if !video.is_published {
        return Err(AppError::Core(CoreError::not_found("video", video_id)));
    }
    Ok(())
}

async fn require_owned(state: &AppState, comment_id: DbId, user_id: DbId) -> AppResult<Comment> {
    ensure_valid_id(comment_id)?;
    let comment = CommentRepo::find_by_id(&state.pool, comment_id)
        .await?
        .ok_or_else(|| CoreError::not_found("comment", comment_id))?;
    if comment.owner_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this comment".into(),
        )));
    }
    Ok(comment)
}
