//! Handlers for the `/playlists` resource.
//!
//! Playlists start private. Private playlists are invisible to everyone
//! but their owner -- listings filter them out and the detail endpoint
//! reports 404, never 403, so their existence does not leak.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use clipstream_core::content::{
    validate_text_range, DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, TITLE_MAX_LEN, TITLE_MIN_LEN,
};
use clipstream_core::error::CoreError;
use clipstream_core::pagination::Page;
use clipstream_core::types::DbId;
use clipstream_db::models::playlist::{
    CreatePlaylist, Playlist, PlaylistListItem, UpdatePlaylistDetails,
};
use clipstream_db::models::video::VideoListItem;
use clipstream_db::repositories::{PlaylistRepo, UserRepo, VideoRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::{ensure_valid_id, PageParams, PlaylistSearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /playlists`.
#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub title: String,
    pub description: String,
}

/// Request body for `PATCH /playlists/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Detail response: the playlist row plus one page of its videos in
/// membership order.
#[derive(Debug, Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub videos: Page<VideoListItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/playlists
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePlaylistRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Playlist>>)> {
    let title = validate_text_range("title", &input.title, TITLE_MIN_LEN, TITLE_MAX_LEN)?;
    let description = validate_text_range(
        "description",
        &input.description,
        DESCRIPTION_MIN_LEN,
        DESCRIPTION_MAX_LEN,
    )?;

    let playlist = PlaylistRepo::create(
        &state.pool,
        auth.user_id,
        &CreatePlaylist { title, description },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(playlist))))
}

/// GET /api/v1/channels/{id}/playlists
pub async fn list_by_channel(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(channel_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Page<PlaylistListItem>>>> {
    ensure_valid_id(channel_id)?;
    UserRepo::find_by_id(&state.pool, channel_id)
        .await?
        .ok_or_else(|| CoreError::not_found("channel", channel_id))?;

    let page = params.to_request(&state.config)?;
    let playlists =
        PlaylistRepo::list_by_owner(&state.pool, channel_id, viewer.user_id(), page).await?;
    Ok(Json(DataResponse::new(playlists)))
}

/// GET /api/v1/playlists/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<PlaylistSearchParams>,
) -> AppResult<Json<DataResponse<Page<PlaylistListItem>>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Search query is required".into(),
        )));
    }
    let page = params.to_request(&state.config)?;
    let playlists = PlaylistRepo::search_by_title(&state.pool, &params.q, page).await?;
    Ok(Json(DataResponse::new(playlists)))
}

/// GET /api/v1/playlists/{id}
///
/// `page`/`limit` window the membership list itself; videos in the window
/// that the viewer may not see (unpublished, not theirs) are filtered out
/// of the page without affecting the totals.
pub async fn get(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(playlist_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<PlaylistDetail>>> {
    ensure_valid_id(playlist_id)?;
    let playlist = PlaylistRepo::find_by_id(&state.pool, playlist_id)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", playlist_id))?;

    if !playlist.is_public && viewer.user_id() != Some(playlist.owner_id) {
        return Err(AppError::Core(CoreError::not_found("playlist", playlist_id)));
    }

    let page = params.to_request(&state.config)?;
    let videos =
        PlaylistRepo::membership_page(&state.pool, playlist_id, viewer.user_id(), page).await?;

    Ok(Json(DataResponse::new(PlaylistDetail { playlist, videos })))
}

/// PATCH /api/v1/playlists/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(playlist_id): Path<DbId>,
    Json(input): Json<UpdatePlaylistRequest>,
) -> AppResult<Json<DataResponse<Playlist>>> {
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

    require_owned(&state, playlist_id, auth.user_id).await?;

    let update = UpdatePlaylistDetails { title, description };
    let playlist = PlaylistRepo::update_details(&state.pool, playlist_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", playlist_id))?;
    Ok(Json(DataResponse::new(playlist)))
}

/// PATCH /api/v1/playlists/{id}/visibility
///
/// Toggle public/private.
pub async fn toggle_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(playlist_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Playlist>>> {
    require_owned(&state, playlist_id, auth.user_id).await?;
    let playlist = PlaylistRepo::toggle_visibility(&state.pool, playlist_id)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", playlist_id))?;
    Ok(Json(DataResponse::new(playlist)))
}

/// POST /api/v1/playlists/{id}/videos/{video_id}
pub async fn add_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((playlist_id, video_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_owned(&state, playlist_id, auth.user_id).await?;
    ensure_valid_id(video_id)?;
    VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or_else(|| CoreError::not_found("video", video_id))?;

    let added = PlaylistRepo::add_video(&state.pool, playlist_id, video_id).await?;
    if !added {
        return Err(AppError::Core(CoreError::Conflict(
            "Video is already in the playlist".into(),
        )));
    }
    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/playlists/{id}/videos/{video_id}
pub async fn remove_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((playlist_id, video_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_owned(&state, playlist_id, auth.user_id).await?;

    let removed = PlaylistRepo::remove_video(&state.pool, playlist_id, video_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::not_found("video", video_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/playlists/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(playlist_id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_owned(&state, playlist_id, auth.user_id).await?;
    PlaylistRepo::delete(&state.pool, playlist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn require_owned(
    state: &AppState,
    playlist_id: DbId,
    user_id: DbId,
) -> AppResult<Playlist> {
    ensure_valid_id(playlist_id)?;
    let playlist = PlaylistRepo::find_by_id(&state.pool, playlist_id)
        .await?
        .ok_or_else(|| CoreError::not_found("playlist", playlist_id))?;
    if playlist.owner_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this playlist".into(),
        )));
    }
    Ok(playlist)
}
