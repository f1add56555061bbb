//! Liveness endpoint, mounted at the root (not under `/api/v1`).

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// GET /healthz -- round-trips the database before reporting ok.
async fn healthz(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    clipstream_db::health_check(&state.pool)
        .await
        .map_err(AppError::Database)?;
    Ok(Json(json!({ "status": "ok" })))
}
