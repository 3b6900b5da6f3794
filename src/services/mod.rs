//! Summarization and translation services.
//!
//! The pipeline only knows the two traits below; the concrete clients speak
//! the Hugging Face Inference API dialect over any [`InferenceCall`]
//! transport, so they work against the hosted API, a self-hosted inference
//! server, or an in-memory double in tests.
//!
//! | Service | Module | Default model | Reply field |
//! |---------|--------|---------------|-------------|
//! | Summarization | [`summarization`] | `t5-base` | `summary_text` |
//! | Translation | [`translation`] | `facebook/m2m100_418M` | `translation_text` |
//!
//! [`InferenceCall`]: crate::api::InferenceCall

use crate::error::ServiceError;
use crate::utils::truncate_for_log;
use serde_json::Value;

pub mod summarization;
pub mod translation;

pub use summarization::Summarizer;
pub use translation::Translator;

/// Produces an abstractive summary of cleaned article text.
#[allow(async_fn_in_trait)]
pub trait Summarize {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError>;
}

/// Translates text between two language codes.
#[allow(async_fn_in_trait)]
pub trait Translate {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ServiceError>;
}

/// Pull the generated text out of an inference reply.
///
/// Replies are usually a one-element array (`[{"summary_text": "..."}]`), but
/// some servers answer with the bare object. The first key in `keys` that is
/// present as a string wins.
pub(crate) fn extract_text(reply: &Value, keys: &[&str]) -> Result<String, ServiceError> {
    let object = match reply {
        Value::Array(items) => items.first(),
        other => Some(other),
    };

    object
        .and_then(|o| keys.iter().find_map(|k| o.get(*k).and_then(Value::as_str)))
        .map(str::to_string)
        .ok_or_else(|| {
            ServiceError::UnexpectedResponse(format!(
                "expected one of {:?} in {}",
                keys,
                truncate_for_log(&reply.to_string(), 200)
            ))
        })
}
