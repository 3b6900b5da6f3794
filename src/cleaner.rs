//! Normalization of raw scraped article text.
//!
//! Scraped bodies arrive with hard line breaks, runs of indentation, and
//! stray glyphs (bullets, emoji, smart symbols) that only waste the
//! summarizer's input budget. Cleaning keeps letters, digits, whitespace and
//! a small set of punctuation:
//!
//! ```text
//! , . - : ; ( ) ' "
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^a-zA-Z0-9,.\-:;()'"\s]"#).expect("valid regex"));

/// Clean article text for summarization.
///
/// Steps, in order:
/// 1. Newline runs become a single space.
/// 2. Whitespace runs become a single space.
/// 3. Characters outside the allow-set are dropped.
/// 4. Leading and trailing whitespace is trimmed.
///
/// Dropping characters happens after collapsing, so `"a ! b"` cleans to
/// `"a  b"` with two spaces.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("Hello\n\nWorld   !!"), "Hello World");
/// assert_eq!(clean_text(""), "");
/// ```
pub fn clean_text(text: &str) -> String {
    let text = NEWLINES.replace_all(text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = DISALLOWED.replace_all(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_newlines_spaces_and_symbols() {
        assert_eq!(clean_text("Hello\n\nWorld   !!"), "Hello World");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n\t  "), "");
    }

    #[test]
    fn test_clean_text_keeps_allowed_punctuation() {
        let s = r#"He said: "Rates rose 0.5 (again)"; it's mid-year, folks."#;
        assert_eq!(clean_text(s), s);
    }

    #[test]
    fn test_clean_text_drops_non_ascii_and_symbols() {
        assert_eq!(clean_text("Price ₹500 — up 10% #news"), "Price 500  up 10 news");
        assert_eq!(clean_text("नमस्ते world"), "world");
    }

    #[test]
    fn test_clean_text_tabs_and_crlf() {
        assert_eq!(clean_text("Line one\r\n\tLine two"), "Line one Line two");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let once = clean_text("  A  story\n\nabout things!  ");
        assert_eq!(clean_text(&once), once);
    }
}
