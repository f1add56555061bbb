//! Handlers for the `/posts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use clipstream_core::content::{validate_text, MAX_POST_LEN};
use clipstream_core::error::CoreError;
use clipstream_core::types::DbId;
use clipstream_db::models::post::{Post, PostListItem};
use clipstream_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ensure_valid_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating or editing a post.
#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub content: String,
}

/// POST /api/v1/posts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<PostRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Post>>)> {
    let content = validate_text("content", &input.content, MAX_POST_LEN)?;
    let post = PostRepo::create(&state.pool, auth.user_id, &content).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(post))))
}

/// GET /api/v1/posts/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostListItem>>> {
    ensure_valid_id(post_id)?;
    let post = PostRepo::find_item(&state.pool, post_id, Some(auth.user_id))
        .await?
        .ok_or_else(|| CoreError::not_found("post", post_id))?;
    Ok(Json(DataResponse::new(post)))
}

/// PATCH /api/v1/posts/{id}
///
/// Editing bumps `updated_at`, which flips the derived edited flag.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<DbId>,
    Json(input): Json<PostRequest>,
) -> AppResult<Json<DataResponse<Post>>> {
    let content = validate_text("content", &input.content, MAX_POST_LEN)?;
    require_owned(&state, post_id, auth.user_id).await?;

    let post = PostRepo::update_content(&state.pool, post_id, &content)
        .await?
        .ok_or_else(|| CoreError::not_found("post", post_id))?;
    Ok(Json(DataResponse::new(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_owned(&state, post_id, auth.user_id).await?;
    PostRepo::delete(&state.pool, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn require_owned(state: &AppState, post_id: DbId, user_id: DbId) -> AppResult<Post> {
    ensure_valid_id(post_id)?;
    let post = PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or_else(|| CoreError::not_found("post", post_id))?;
    if post.owner_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this post".into(),
        )));
    }
    Ok(post)
}
