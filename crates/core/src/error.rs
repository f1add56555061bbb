//! Domain error taxonomy.
//!
//! Every fallible operation below the HTTP layer returns [`CoreError`].
//! The API crate maps these onto status codes; nothing in this crate knows
//! about HTTP.

use crate::types::DbId;

/// Domain-level error shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist (or a page lies beyond the last one).
    #[error("{entity} not found: {key}")]
    NotFound {
        entity: &'static str,
        /// Identifying key as a display string (id, username, ...).
        key: String,
    },

    /// Malformed or out-of-range caller input. Never retried.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A uniqueness or state conflict (duplicate username, video already in playlist).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Storage or media-store failure. Logged with context, reported generically.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// NotFound for an entity addressed by numeric id.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            key: id.to_string(),
        }
    }

    /// NotFound for an entity addressed by a string key (e.g. username).
    pub fn not_found_key(entity: &'static str, key: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_key() {
        let err = CoreError::not_found("video", 42);
        assert_eq!(err.to_string(), "video not found: 42");
    }

    #[test]
    fn not_found_key_accepts_usernames() {
        let err = CoreError::not_found_key("user", "alice");
        assert_eq!(err.to_string(), "user not found: alice");
    }
}
