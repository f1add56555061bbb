//! Subscription entity: (subscriber, channel) pair.

use clipstream_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full subscription row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub subscriber_id: DbId,
    pub channel_id: DbId,
    pub created_at: Timestamp,
}
