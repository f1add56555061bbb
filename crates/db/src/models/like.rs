//! Like entity: a polymorphic (actor, target) join row.

use clipstream_core::types::DbId;
use serde::Serialize;

/// The thing a like points at. Exactly one target, enforced by the type
/// rather than by three nullable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video(DbId),
    Comment(DbId),
    Post(DbId),
}

impl LikeTarget {
    /// Discriminator stored in `likes.target_type`.
    pub fn kind(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video",
            LikeTarget::Comment(_) => "comment",
            LikeTarget::Post(_) => "post",
        }
    }

    pub fn id(&self) -> DbId {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Post(id) => *id,
        }
    }
}

/// Result of a toggle: the state the like ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Liked,
    Unliked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(LikeTarget::Video(1).kind(), "video");
        assert_eq!(LikeTarget::Comment(2).kind(), "comment");
        assert_eq!(LikeTarget::Post(3).kind(), "post");
    }

    #[test]
    fn id_is_target_id() {
        assert_eq!(LikeTarget::Post(42).id(), 42);
    }
}
