//! Post-processing of generated text.
//!
//! Two fixups run on model output before it is stored:
//!
//! - [`fix_punctuation`] restores sentence-initial capitals in the English
//!   summary. Summarizers trained on lowercased corpora often return
//!   `"the minister said. it will"`.
//! - [`apply_sentence_terminator`] rewrites the Latin full stop into the
//!   target script's own terminator (for Hindi, `।`).
//!
//! Capitalization is only meaningful for cased Latin text and is never
//! applied to the translation.

use crate::utils::upcase;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SENTENCE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?]\s+)([a-z])").expect("valid regex"));

/// Capitalize the first letter after every sentence boundary, and the first
/// character of the text.
///
/// A boundary is `.`, `!` or `?` followed by at least one whitespace
/// character; the capitalized letter must come right after that whitespace.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(fix_punctuation("hello world. this is fine."), "Hello world. This is fine.");
/// assert_eq!(fix_punctuation(""), "");
/// ```
pub fn fix_punctuation(text: &str) -> String {
    let text = SENTENCE_START.replace_all(text, |caps: &Captures| {
        format!("{}{}", &caps[1], caps[2].to_uppercase())
    });
    upcase(&text)
}

/// Replace every ASCII `.` with `terminator`.
///
/// With `None` the text is returned unchanged; that is the case for every
/// target language whose script uses the Latin full stop.
pub fn apply_sentence_terminator(text: &str, terminator: Option<&str>) -> String {
    match terminator {
        Some(t) => text.replace('.', t),
        None => text.to_string(),
    }
}
