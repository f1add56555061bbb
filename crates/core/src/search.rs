//! Text-search helpers for ILIKE-based title/content search.
//!
//! User input is matched as a literal substring: the LIKE metacharacters
//! `%`, `_` and the escape character `\` are neutralized before the term
//! is embedded in a pattern. Queries using these patterns must carry
//! `ESCAPE '\'`.

/// Escape LIKE metacharacters so the input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build a case-insensitive substring pattern (`%term%`) from raw input.
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(escape_like("rust tutorial"), "rust tutorial");
    }

    #[test]
    fn escapes_percent() {
        assert_eq!(escape_like("a%b"), "a\\%b");
    }

    #[test]
    fn escapes_underscore() {
        assert_eq!(escape_like("snake_case"), "snake\\_case");
    }

    #[test]
    fn escapes_backslash_first() {
        assert_eq!(escape_like("a\\%"), "a\\\\\\%");
    }

    #[test]
    fn contains_pattern_wraps_and_trims() {
        assert_eq!(contains_pattern("  50% off  "), "%50\\% off%");
    }
}
