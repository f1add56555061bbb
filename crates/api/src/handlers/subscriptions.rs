//! Handlers for channel subscriptions.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use clipstream_core::error::CoreError;
use clipstream_core::types::DbId;
use clipstream_db::models::user::UserSummary;
use clipstream_db::repositories::{SubscriptionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ensure_valid_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a subscription toggle.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscribed: bool,
}

/// POST /api/v1/channels/{id}/subscription
///
/// The self-subscription rule is checked before anything else: it holds
/// regardless of whether the channel exists or a subscription does.
pub async fn toggle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubscriptionResponse>>> {
    ensure_valid_id(channel_id)?;
    if channel_id == auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot subscribe to yourself".into(),
        )));
    }

    UserRepo::find_by_id(&state.pool, channel_id)
        .await?
        .ok_or_else(|| CoreError::not_found("channel", channel_id))?;

    let subscribed = SubscriptionRepo::toggle(&state.pool, auth.user_id, channel_id).await?;
    Ok(Json(DataResponse::new(SubscriptionResponse { subscribed })))
}

/// GET /api/v1/channels/{id}/subscribers
pub async fn list_subscribers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(channel_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    ensure_valid_id(channel_id)?;
    UserRepo::find_by_id(&state.pool, channel_id)
        .await?
        .ok_or_else(|| CoreError::not_found("channel", channel_id))?;

    let subscribers = SubscriptionRepo::list_subscribers(&state.pool, channel_id).await?;
    Ok(Json(DataResponse::new(subscribers)))
}

/// GET /api/v1/users/me/subscriptions
pub async fn list_subscribed_channels(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let channels = SubscriptionRepo::list_subscribed_channels(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(channels)))
}
