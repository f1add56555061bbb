//! Sort allow-lists for listing queries.
//!
//! Sort keys map to fixed SQL expressions -- never to caller-supplied
//! strings -- so ORDER BY clauses cannot be injected. Parsing happens
//! before any query executes.

use crate::error::CoreError;

/// Sort direction. Listings default to newest/largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match input {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CoreError::Validation(format!(
                "invalid sort order '{other}' (expected 'asc' or 'desc')"
            ))),
        }
    }

    pub fn parse_optional(input: Option<&str>) -> Result<Self, CoreError> {
        input.map_or(Ok(SortOrder::default()), Self::parse)
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Allowed sort keys for video listings.
///
/// `Likes` sorts on the derived `like_count` column computed by the list
/// query, so it is only valid where that projection is present -- which is
/// every video listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortKey {
    #[default]
    CreatedAt,
    Views,
    Likes,
    Duration,
}

impl VideoSortKey {
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match input {
            "created_at" => Ok(VideoSortKey::CreatedAt),
            "views" => Ok(VideoSortKey::Views),
            "likes" => Ok(VideoSortKey::Likes),
            "duration" => Ok(VideoSortKey::Duration),
            other => Err(CoreError::Validation(format!(
                "invalid sort key '{other}' (expected one of: created_at, views, likes, duration)"
            ))),
        }
    }

    pub fn parse_optional(input: Option<&str>) -> Result<Self, CoreError> {
        input.map_or(Ok(VideoSortKey::default()), Self::parse)
    }

    /// The ORDER BY expression this key maps to.
    pub fn as_sql(&self) -> &'static str {
        match self {
            VideoSortKey::CreatedAt => "v.created_at",
            VideoSortKey::Views => "v.views",
            VideoSortKey::Likes => "like_count",
            VideoSortKey::Duration => "v.duration_secs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_orders() {
        assert_eq!(SortOrder::parse("asc").unwrap(), SortOrder::Asc);
        assert_eq!(SortOrder::parse("desc").unwrap(), SortOrder::Desc);
    }

    #[test]
    fn rejects_unknown_order() {
        assert!(SortOrder::parse("sideways").is_err());
        assert!(SortOrder::parse("ASC").is_err());
    }

    #[test]
    fn order_defaults_to_desc() {
        assert_eq!(SortOrder::parse_optional(None).unwrap(), SortOrder::Desc);
    }

    #[test]
    fn parses_known_video_keys() {
        assert_eq!(
            VideoSortKey::parse("created_at").unwrap(),
            VideoSortKey::CreatedAt
        );
        assert_eq!(VideoSortKey::parse("views").unwrap(), VideoSortKey::Views);
        assert_eq!(VideoSortKey::parse("likes").unwrap(), VideoSortKey::Likes);
        assert_eq!(
            VideoSortKey::parse("duration").unwrap(),
            VideoSortKey::Duration
        );
    }

    #[test]
    fn rejects_unknown_video_key() {
        assert!(VideoSortKey::parse("owner").is_err());
    }

    #[test]
    fn video_key_defaults_to_created_at() {
        assert_eq!(
            VideoSortKey::parse_optional(None).unwrap(),
            VideoSortKey::CreatedAt
        );
    }

    #[test]
    fn sql_expressions_are_fixed() {
        assert_eq!(VideoSortKey::Likes.as_sql(), "like_count");
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
    }
}
