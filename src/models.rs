//! Data models for scraped articles and their processed representation.
//!
//! Articles are kept as loosely-typed JSON objects: the scraper that produced
//! the input decides which fields exist, and every field we do not touch must
//! come back out unchanged and in the same position. Only three keys are
//! understood here:
//!
//! - `content`: the raw article text (read)
//! - `summary`: the capitalized summary (written)
//! - `translated_text`: the translated summary (written)
//!
//! A fourth key, `processing_error`, is written when an article fails under
//! the isolating failure policy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the raw article text.
pub const CONTENT_KEY: &str = "content";
/// Key the capitalized summary is stored under.
pub const SUMMARY_KEY: &str = "summary";
/// Key the translated summary is stored under.
pub const TRANSLATED_TEXT_KEY: &str = "translated_text";
/// Key recording why an article could not be processed.
pub const PROCESSING_ERROR_KEY: &str = "processing_error";

/// A single scraped news item.
///
/// Serializes transparently as the underlying JSON object, so field order and
/// unknown fields survive a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Article(Map<String, Value>);

/// The whole input file: an ordered list of articles.
pub type ArticleCollection = Vec<Article>;

impl Article {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The article text, if present as a non-empty string.
    ///
    /// Missing, empty, and non-string `content` all read as `None`; the
    /// pipeline leaves such articles untouched.
    pub fn content(&self) -> Option<&str> {
        match self.0.get(CONTENT_KEY) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// True when `content` exists but is not a string.
    pub fn has_non_text_content(&self) -> bool {
        matches!(self.0.get(CONTENT_KEY), Some(v) if !v.is_string() && !v.is_null())
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.get(SUMMARY_KEY).and_then(Value::as_str)
    }

    pub fn translated_text(&self) -> Option<&str> {
        self.0.get(TRANSLATED_TEXT_KEY).and_then(Value::as_str)
    }

    pub fn processing_error(&self) -> Option<&str> {
        self.0.get(PROCESSING_ERROR_KEY).and_then(Value::as_str)
    }

    /// Attach the results of a successful run.
    pub fn set_results(&mut self, summary: String, translated_text: String) {
        self.0.insert(SUMMARY_KEY.to_string(), Value::String(summary));
        self.0
            .insert(TRANSLATED_TEXT_KEY.to_string(), Value::String(translated_text));
    }

    /// Record that processing failed for this article.
    pub fn mark_failed(&mut self, reason: &str) {
        self.0.insert(
            PROCESSING_ERROR_KEY.to_string(),
            Value::String(reason.to_string()),
        );
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(value: Value) -> Article {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_new_matches_deserialized_object() {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("T"));
        fields.insert("content".to_string(), json!("Body text"));

        let a = Article::new(fields);
        assert_eq!(a, article(json!({"title": "T", "content": "Body text"})));
        assert_eq!(a.content(), Some("Body text"));
        assert_eq!(a.keys().collect::<Vec<_>>(), vec!["title", "content"]);
    }

    #[test]
    fn test_content_present() {
        let a = article(json!({"title": "T", "content": "Body text"}));
        assert_eq!(a.content(), Some("Body text"));
    }

    #[test]
    fn test_content_missing_or_empty() {
        assert_eq!(article(json!({"title": "T"})).content(), None);
        assert_eq!(article(json!({"content": ""})).content(), None);
        assert_eq!(article(json!({"content": null})).content(), None);
    }

    #[test]
    fn test_non_string_content_is_not_text() {
        let a = article(json!({"content": 42}));
        assert_eq!(a.content(), None);
        assert!(a.has_non_text_content());
        assert!(!article(json!({"content": null})).has_non_text_content());
    }

    #[test]
    fn test_set_results_appends_after_existing_fields() {
        let mut a = article(json!({"url": "https://example.com", "content": "x"}));
        a.set_results("Summary.".to_string(), "सारांश।".to_string());

        let keys: Vec<&str> = a.keys().collect();
        assert_eq!(keys, vec!["url", "content", "summary", "translated_text"]);
        assert_eq!(a.summary(), Some("Summary."));
        assert_eq!(a.translated_text(), Some("सारांश।"));
    }

    #[test]
    fn test_mark_failed() {
        let mut a = article(json!({"content": "x"}));
        a.mark_failed("endpoint responded with 500: boom");
        assert_eq!(
            a.processing_error(),
            Some("endpoint responded with 500: boom")
        );
        assert_eq!(a.summary(), None);
    }

    #[test]
    fn test_serializes_transparently() {
        let a = article(json!({"b": 1, "a": 2}));
        assert_eq!(serde_json::to_string(&a).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
