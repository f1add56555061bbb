//! Handlers for the `/videos` resource.
//!
//! Publishing and thumbnail updates go through the media store; listing
//! and search run the shared enrichment pipeline with publish-status
//! authorization applied per endpoint.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use clipstream_cloud::{MediaKind, StoredMedia};
use clipstream_core::content::{
    validate_text_range, DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, TITLE_MAX_LEN, TITLE_MIN_LEN,
};
use clipstream_core::error::CoreError;
use clipstream_core::pagination::Page;
use clipstream_core::types::DbId;
use clipstream_db::models::video::{CreateVideo, UpdateVideoDetails, Video, VideoListItem};
use clipstream_db::repositories::{UserRepo, VideoRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::{ensure_valid_id, SearchParams, VideoListParams};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::{stage_field, StagedFile};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/videos
///
/// Multipart: `title`, `description` text fields plus `video` and
/// `thumbnail` files. The video goes up first (with a duration probe);
/// the row is only inserted once both objects are stored.
pub async fn publish(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Video>>)> {
    let mut title = String::new();
    let mut description = String::new();
    let mut video_file: Option<StagedFile> = None;
    let mut thumbnail_file: Option<StagedFile> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
            }
            "description" => {
                description = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
            }
            "video" => {
                video_file = Some(stage_field(&state.config.upload_dir, &mut field).await?)
            }
            "thumbnail" => {
                thumbnail_file = Some(stage_field(&state.config.upload_dir, &mut field).await?)
            }
            other => {
                tracing::debug!(field = other, "ignoring unknown multipart field");
            }
        }
    }

    let inputs = validate_publish_inputs(&title, &description);
    let ((title, description), video_file, thumbnail_file) =
        match (inputs, video_file, thumbnail_file) {
            (Ok(fields), Some(video), Some(thumbnail)) => (fields, video, thumbnail),
            (inputs, video, thumbnail) => {
                remove_all(video.as_ref(), thumbnail.as_ref()).await;
                return Err(match inputs {
                    Err(err) => err,
                    Ok(_) if video.is_none() => {
                        AppError::Core(CoreError::Validation("Video file is required".into()))
                    }
                    Ok(_) => {
                        AppError::Core(CoreError::Validation("Thumbnail file is required".into()))
                    }
                });
            }
        };

    // Upload the video; its duration gates the insert.
    let uploaded_video = state.media.upload(&video_file.path, MediaKind::Video).await;
    video_file.remove().await;
    let uploaded_video = match uploaded_video {
        Ok(media) => media,
        Err(err) => {
            thumbnail_file.remove().await;
            return Err(err.into());
        }
    };

    if uploaded_video.duration_secs.unwrap_or(0.0) <= 0.0 {
        thumbnail_file.remove().await;
        rollback_media(&state, &uploaded_video).await;
        return Err(AppError::Core(CoreError::Validation(
            "Could not determine video duration".into(),
        )));
    }

    let uploaded_thumbnail = state
        .media
        .upload(&thumbnail_file.path, MediaKind::Image)
        .await;
    thumbnail_file.remove().await;
    let uploaded_thumbnail = match uploaded_thumbnail {
        Ok(media) => media,
        Err(err) => {
            rollback_media(&state, &uploaded_video).await;
            return Err(err.into());
        }
    };

    let input = CreateVideo {
        owner_id: auth.user_id,
        video_url: uploaded_video.url.clone(),
        video_public_id: uploaded_video.public_id.clone(),
        thumbnail_url: uploaded_thumbnail.url.clone(),
        thumbnail_public_id: uploaded_thumbnail.public_id.clone(),
        title,
        description,
        duration_secs: uploaded_video.duration_secs.unwrap_or(0.0),
    };

    match VideoRepo::create(&state.pool, &input).await {
        Ok(video) => Ok((StatusCode::CREATED, Json(DataResponse::new(video)))),
        Err(err) => {
            rollback_media(&state, &uploaded_video).await;
            rollback_media(&state, &uploaded_thumbnail).await;
            Err(err.into())
        }
    }
}

/// GET /api/v1/videos
///
/// Public catalog of published videos.
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<VideoListParams>,
) -> AppResult<Json<DataResponse<Page<VideoListItem>>>> {
    let page = params.to_request(&state.config)?;
    let (sort, order) = params.to_sort()?;
    let videos =
        VideoRepo::list_published(&state.pool, viewer.user_id(), sort, order, page).await?;
    Ok(Json(DataResponse::new(videos)))
}

/// GET /api/v1/videos/search?q=
///
/// Literal substring title search over published videos.
pub async fn search(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Page<VideoListItem>>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Search query is required".into(),
        )));
    }
    let page = params.to_request(&state.config)?;
    let (sort, order) = params.to_sort()?;
    let videos = VideoRepo::search_by_title(
        &state.pool,
        &params.q,
        viewer.user_id(),
        sort,
        order,
        page,
    )
    .await?;
    Ok(Json(DataResponse::new(videos)))
}

/// GET /api/v1/videos/{id}
///
/// Unpublished videos are visible to their owner only. A successful read
/// counts a view and records the video in the viewer's watch history;
/// failures of those side effects surface as internal errors, not 404s.
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoListItem>>> {
    ensure_valid_id(video_id)?;
    let video = VideoRepo::find_item(&state.pool, video_id, Some(auth.user_id))
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;

    if !video.is_published && video.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::not_found("video", video_id)));
    }

    VideoRepo::increment_views(&state.pool, video_id).await?;
    UserRepo::upsert_watch_history(&state.pool, auth.user_id, video_id).await?;

    Ok(Json(DataResponse::new(video)))
}

/// GET /api/v1/channels/{id}/videos
///
/// A channel's videos; the owner also sees unpublished ones.
pub async fn list_by_channel(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(channel_id): Path<DbId>,
    Query(params): Query<VideoListParams>,
) -> AppResult<Json<DataResponse<Page<VideoListItem>>>> {
    ensure_valid_id(channel_id)?;
    UserRepo::find_by_id(&state.pool, channel_id)
        .await?
        .ok_or_else(|| CoreError::not_found("channel", channel_id))?;

    let page = params.to_request(&state.config)?;
    let (sort, order) = params.to_sort()?;
    let videos = VideoRepo::list_by_owner(
        &state.pool,
        channel_id,
        viewer.user_id(),
        sort,
        order,
        page,
    )
    .await?;
    Ok(Json(DataResponse::new(videos)))
}

/// Request body for `PATCH /videos/{id}`. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// PATCH /api/v1/videos/{id}
pub async fn update_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
    Json(input): Json<UpdateDetailsRequest>,
) -> AppResult<Json<DataResponse<Video>>> {
    let title = input
        .title
        .as_deref()
        .map(|t| validate_text_range("title", t, TITLE_MIN_LEN, TITLE_MAX_LEN))
        .transpose()?;
    let description = input
        .description
        .as_deref()
        .map(|d| validate_text_range("description", d, DESCRIPTION_MIN_LEN, DESCRIPTION_MAX_LEN))
        .transpose()?;

    require_owned(&state, video_id, auth.user_id).await?;

    let update = UpdateVideoDetails { title, description };
    let video = VideoRepo::update_details(&state.pool, video_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;
    Ok(Json(DataResponse::new(video)))
}

/// PATCH /api/v1/videos/{id}/thumbnail
///
/// Multipart with a single `thumbnail` file. The previous thumbnail
/// object is deleted from the store best-effort.
pub async fn update_thumbnail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Video>>> {
    let existing = require_owned(&state, video_id, auth.user_id).await?;

    let mut staged: Option<StagedFile> = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("thumbnail") {
            staged = Some(stage_field(&state.config.upload_dir, &mut field).await?);
        }
    }
    let staged = staged.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Thumbnail file is required".into()))
    })?;

    let uploaded = state.media.upload(&staged.path, MediaKind::Image).await;
    staged.remove().await;
    let uploaded = uploaded?;

    match VideoRepo::update_thumbnail(&state.pool, video_id, &uploaded.url, &uploaded.public_id)
        .await
    {
        Ok(Some(video)) => {
            // The old object is unreferenced now.
            if let Err(err) = state.media.delete(&existing.thumbnail_public_id).await {
                tracing::warn!(
                    public_id = %existing.thumbnail_public_id,
                    error = %err,
                    "failed to delete replaced thumbnail"
                );
            }
            Ok(Json(DataResponse::new(video)))
        }
        Ok(None) => {
            rollback_media(&state, &uploaded).await;
            Err(AppError::Core(CoreError::not_found("video", video_id)))
        }
        Err(err) => {
            rollback_media(&state, &uploaded).await;
            Err(err.into())
        }
    }
}

/// PATCH /api/v1/videos/{id}/publish
///
/// Toggle the publish flag.
pub async fn toggle_publish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Video>>> {
    require_owned(&state, video_id, auth.user_id).await?;
    let video = VideoRepo::toggle_publish(&state.pool, video_id)
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;
    Ok(Json(DataResponse::new(video)))
}

/// DELETE /api/v1/videos/{id}
///
/// Deletes the row and its dependents, then releases the stored media
/// objects best-effort.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_owned(&state, video_id, auth.user_id).await?;

    let deleted = VideoRepo::delete(&state.pool, video_id)
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;

    for public_id in [&deleted.video_public_id, &deleted.thumbnail_public_id] {
        if let Err(err) = state.media.delete(public_id).await {
            tracing::warn!(%public_id, error = %err, "failed to delete stored media");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Existence check, then ownership check -- in that order, so a foreign
/// video yields 403 rather than leaking as 404.
async fn require_owned(state: &AppState, video_id: DbId, user_id: DbId) -> AppResult<Video> {
    ensure_valid_id(video_id)?;
    let video = VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;
    if video.owner_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this video".into(),
        )));
    }
    Ok(video)
}

fn validate_publish_inputs(title: &str, description: &str) -> Result<(String, String), AppError> {
    let title = validate_text_range("title", title, TITLE_MIN_LEN, TITLE_MAX_LEN)?;
    let description = validate_text_range(
        "description",
        description,
        DESCRIPTION_MIN_LEN,
        DESCRIPTION_MAX_LEN,
    )?;
    Ok((title, description))
}

async fn remove_all(video: Option<&StagedFile>, thumbnail: Option<&StagedFile>) {
    if let Some(staged) = video {
        staged.remove().await;
    }
    if let Some(staged) = thumbnail {
        staged.remove().await;
    }
}

/// Best-effort rollback of an uploaded object.
async fn rollback_media(state: &AppState, media: &StoredMedia) {
    if let Err(err) = state.media.delete(&media.public_id).await {
        tracing::warn!(public_id = %media.public_id, error = %err, "failed to roll back uploaded media");
    }
}
