//! Content-length rules for user-authored text.
//!
//! The API layer validates request DTOs with the same bounds; these
//! helpers are the single source of truth and are re-checked in the
//! repositories' callers so no write path can bypass them.

use crate::error::CoreError;

/// Maximum comment length in characters.
pub const MAX_COMMENT_LEN: usize = 200;

/// Maximum post length in characters.
pub const MAX_POST_LEN: usize = 500;

/// Title bounds (videos and playlists).
pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 100;

/// Description bounds (videos and playlists).
pub const DESCRIPTION_MIN_LEN: usize = 3;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Trim and bound-check a required text field. Returns the trimmed value.
pub fn validate_text(field: &'static str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim and range-check a text field with a lower bound as well.
pub fn validate_text_range(
    field: &'static str,
    value: &str,
    min_len: usize,
    max_len: usize,
) -> Result<String, CoreError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min_len || len > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be between {min_len} and {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_valid_text() {
        assert_eq!(
            validate_text("comment", "  hello  ", MAX_COMMENT_LEN).unwrap(),
            "hello"
        );
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(validate_text("comment", "", MAX_COMMENT_LEN).is_err());
        assert!(validate_text("comment", "   ", MAX_COMMENT_LEN).is_err());
    }

    #[test]
    fn rejects_overlong_text() {
        let long = "x".repeat(MAX_COMMENT_LEN + 1);
        assert!(validate_text("comment", &long, MAX_COMMENT_LEN).is_err());
    }

    #[test]
    fn exact_limit_is_accepted() {
        let exact = "x".repeat(MAX_POST_LEN);
        assert!(validate_text("post", &exact, MAX_POST_LEN).is_ok());
    }

    #[test]
    fn range_check_enforces_minimum() {
        assert!(validate_text_range("title", "ab", TITLE_MIN_LEN, TITLE_MAX_LEN).is_err());
        assert!(validate_text_range("title", "abc", TITLE_MIN_LEN, TITLE_MAX_LEN).is_ok());
    }

    #[test]
    fn length_is_counted_in_characters_not_bytes() {
        let title = "日本語のタイトル";
        assert!(validate_text_range("title", title, TITLE_MIN_LEN, TITLE_MAX_LEN).is_ok());
    }
}
