//! Post text validation and sanitization

use crate::{BoardError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest accepted raw post, counted in characters before escaping
pub const MAX_POST_LENGTH: usize = 200;

static CONTROL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\n\r]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Check raw post text. Rejects absent input, blank input and input longer
/// than [`MAX_POST_LENGTH`] characters.
pub fn validate(raw: Option<&str>) -> Result<&str> {
    let raw = raw.ok_or_else(|| BoardError::InvalidInput("text is required".to_string()))?;

    if raw.trim().is_empty() {
        return Err(BoardError::InvalidInput("text is empty".to_string()));
    }

    let length = raw.chars().count();
    if length > MAX_POST_LENGTH {
        return Err(BoardError::InvalidInput(format!(
            "text is {} characters, the limit is {}",
            length, MAX_POST_LENGTH
        )));
    }

    Ok(raw)
}

/// Escape HTML special characters. `&` goes first so the entities added
/// for the other characters are not escaped again.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Turn tabs and line breaks into spaces and squeeze whitespace runs.
pub fn normalize_whitespace(text: &str) -> String {
    let spaced = CONTROL_WHITESPACE.replace_all(text, " ");
    WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string()
}

/// Form stored for a validated post.
pub fn sanitize(text: &str) -> String {
    normalize_whitespace(&escape_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_escapes_markup() {
        assert_eq!(sanitize("<b>"), "&lt;b&gt;");
        assert_eq!(
            sanitize(r#"Tom & "Jerry's" <i>"#),
            "Tom &amp; &quot;Jerry&#39;s&quot; &lt;i&gt;"
        );
    }

    #[test]
    fn test_existing_entities_are_escaped_again() {
        assert_eq!(sanitize("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize("a\t\tb\n c"), "a b c");
        assert_eq!(sanitize("  one\r\n\r\ntwo   three  "), "one two three");
    }

    #[test]
    fn test_rejects_missing_and_blank_text() {
        assert_eq!(
            validate(None),
            Err(BoardError::InvalidInput("text is required".to_string()))
        );
        assert_err!(validate(Some("")));
        assert_err!(validate(Some(" ")));
        assert_err!(validate(Some("\t\n")));
    }

    #[test]
    fn test_length_limit_counts_characters() {
        let at_limit = "x".repeat(MAX_POST_LENGTH);
        assert_ok!(validate(Some(at_limit.as_str())));

        let over_limit = "x".repeat(MAX_POST_LENGTH + 1);
        assert_err!(validate(Some(over_limit.as_str())));

        // Multi-byte characters count once each.
        let wide = "é".repeat(MAX_POST_LENGTH);
        assert_ok!(validate(Some(wide.as_str())));
    }

    #[test]
    fn test_limit_applies_before_escaping() {
        let markup = "<".repeat(MAX_POST_LENGTH);
        let raw = assert_ok!(validate(Some(markup.as_str())));
        assert_eq!(sanitize(raw).len(), 4 * MAX_POST_LENGTH);
    }
}
