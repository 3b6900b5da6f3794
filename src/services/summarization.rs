//! Abstractive summarization client.
//!
//! Requests follow the text2text convention used by T5-style models: the
//! task is named by an instruction prefix on the input itself, and beam
//! search settings travel in `parameters`.
//!
//! ```json
//! {
//!   "inputs": "summarize: The council met on Monday ...",
//!   "parameters": {
//!     "max_length": 150,
//!     "num_beams": 4,
//!     "length_penalty": 1.0,
//!     "no_repeat_ngram_size": 2,
//!     "early_stopping": true
//!   },
//!   "options": { "wait_for_model": true }
//! }
//! ```

use super::{Summarize, extract_text};
use crate::api::{HttpEndpoint, InferenceCall, Retry, build_client};
use crate::config::{DigestConfig, GenerationParams, endpoint_url};
use crate::error::{ConfigError, ServiceError};
use crate::utils::truncate_words;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Reply keys carrying the summary, in order of preference.
const REPLY_KEYS: &[&str] = &["summary_text", "generated_text"];

/// Summarization client over any JSON inference transport.
#[derive(Debug)]
pub struct Summarizer<C> {
    endpoint: C,
    task_prefix: String,
    params: GenerationParams,
}

impl<C> Summarizer<C> {
    pub fn new(endpoint: C, task_prefix: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            endpoint,
            task_prefix: task_prefix.into(),
            params,
        }
    }

    /// The request body for `text`.
    ///
    /// The prefixed prompt is cut to `max_input_tokens` words; anything past
    /// the budget is dropped without notice, as a tokenizer would.
    pub fn payload(&self, text: &str) -> Value {
        let prompt = format!("{}{}", self.task_prefix, text);
        let prompt = truncate_words(&prompt, self.params.max_input_tokens);
        json!({
            "inputs": prompt,
            "parameters": {
                "max_length": self.params.max_output_tokens,
                "num_beams": self.params.beam_width,
                "length_penalty": self.params.length_penalty,
                "no_repeat_ngram_size": self.params.no_repeat_ngram,
                "early_stopping": self.params.early_stopping,
            },
            "options": { "wait_for_model": true },
        })
    }
}

impl Summarizer<Retry<HttpEndpoint>> {
    /// Build the HTTP-backed summarizer described by `config`.
    pub fn from_config(config: &DigestConfig) -> Result<Self, ConfigError> {
        let s = &config.summarization;
        let url = endpoint_url(&s.base_url, &s.model)?;
        let client = build_client(config.timeout()).map_err(ConfigError::HttpClient)?;
        let endpoint = Retry::new(
            HttpEndpoint::new(client, url, config.api_token.clone()),
            config.max_retries,
            config.retry_base_delay(),
        );
        Ok(Self::new(endpoint, s.task_prefix.clone(), s.generation.clone()))
    }
}

impl<C> Summarize for Summarizer<C>
where
    C: InferenceCall<Response = Value>,
{
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    async fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        let reply = self.endpoint.call(&self.payload(text)).await?;
        let summary = extract_text(&reply, REPLY_KEYS)?;
        debug!(summary_chars = summary.chars().count(), "Summary generated");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records each payload and answers with a canned reply.
    struct Canned {
        reply: Value,
        seen: Mutex<Vec<Value>>,
    }

    impl Canned {
        fn new(reply: Value) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl InferenceCall for Canned {
        type Response = Value;

        async fn call(&self, payload: &Value) -> Result<Value, ServiceError> {
            self.seen.lock().unwrap().push(payload.clone());
            Ok(self.reply.clone())
        }
    }

    fn summarizer(reply: Value) -> Summarizer<Canned> {
        Summarizer::new(Canned::new(reply), "summarize: ", GenerationParams::default())
    }

    #[test]
    fn test_payload_carries_prefix_and_generation_params() {
        let s = summarizer(json!(null));
        let payload = s.payload("The council met.");

        assert_eq!(payload["inputs"], "summarize: The council met.");
        assert_eq!(payload["parameters"]["max_length"], 150);
        assert_eq!(payload["parameters"]["num_beams"], 4);
        assert_eq!(payload["parameters"]["length_penalty"], 1.0);
        assert_eq!(payload["parameters"]["no_repeat_ngram_size"], 2);
        assert_eq!(payload["parameters"]["early_stopping"], true);
        assert_eq!(payload["options"]["wait_for_model"], true);
    }

    #[test]
    fn test_payload_keeps_fractional_length_penalty() {
        let params = GenerationParams {
            length_penalty: 0.6,
            ..GenerationParams::default()
        };
        let s = Summarizer::new(Canned::new(json!(null)), "summarize: ", params);
        let payload = s.payload("The council met.");
        assert_eq!(payload["parameters"]["length_penalty"], 0.6);
        assert_eq!(payload["parameters"]["length_penalty"].to_string(), "0.6");
    }

    #[test]
    fn test_payload_truncates_to_input_budget() {
        let params = GenerationParams {
            max_input_tokens: 4,
            ..GenerationParams::default()
        };
        let s = Summarizer::new(Canned::new(json!(null)), "summarize: ", params);
        let payload = s.payload("one two three four five");
        assert_eq!(payload["inputs"], "summarize: one two three");
    }

    #[tokio::test]
    async fn test_summarize_reads_summary_text() {
        let s = summarizer(json!([{"summary_text": "the council met. it voted."}]));
        let out = s.summarize("The council met on Monday and voted.").await.unwrap();
        assert_eq!(out, "the council met. it voted.");
        assert_eq!(s.endpoint.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_summarize_rejects_unexpected_reply() {
        let s = summarizer(json!({"error": "Model t5-base is currently loading"}));
        let err = s.summarize("text").await.unwrap_err();
        assert!(matches!(err, ServiceError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_from_config_uses_model_endpoint() {
        let config = DigestConfig::default();
        let s = Summarizer::from_config(&config).unwrap();
        assert_eq!(
            s.endpoint.inner().url().as_str(),
            "https://api-inference.huggingface.co/models/t5-base"
        );
    }
}
