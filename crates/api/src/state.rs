use std::sync::Arc;

use clipstream_cloud::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clipstream_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Media store (S3 in production, a stub in tests).
    pub media: Arc<dyn MediaStore>,
}
