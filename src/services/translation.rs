//! Many-to-many translation client.
//!
//! M2M100 needs both ends of the language pair on every request:
//!
//! ```json
//! {
//!   "inputs": "The council met on Monday.",
//!   "parameters": { "src_lang": "en", "tgt_lang": "hi" },
//!   "options": { "wait_for_model": true }
//! }
//! ```
//!
//! The reply is returned exactly as generated; script conventions such as
//! the Devanagari full stop are applied by the pipeline.

use super::{Translate, extract_text};
use crate::api::{HttpEndpoint, InferenceCall, Retry, build_client};
use crate::config::{DigestConfig, endpoint_url};
use crate::error::{ConfigError, ServiceError};
use serde_json::{Value, json};
use tracing::{debug, instrument};

const REPLY_KEYS: &[&str] = &["translation_text", "generated_text"];

/// Translation client over any JSON inference transport.
#[derive(Debug)]
pub struct Translator<C> {
    endpoint: C,
}

impl<C> Translator<C> {
    pub fn new(endpoint: C) -> Self {
        Self { endpoint }
    }

    pub fn payload(text: &str, source_lang: &str, target_lang: &str) -> Value {
        json!({
            "inputs": text,
            "parameters": { "src_lang": source_lang, "tgt_lang": target_lang },
            "options": { "wait_for_model": true },
        })
    }
}

impl Translator<Retry<HttpEndpoint>> {
    /// Build the HTTP-backed translator described by `config`.
    pub fn from_config(config: &DigestConfig) -> Result<Self, ConfigError> {
        let t = &config.translation;
        let url = endpoint_url(&t.base_url, &t.model)?;
        let client = build_client(config.timeout()).map_err(ConfigError::HttpClient)?;
        Ok(Self::new(Retry::new(
            HttpEndpoint::new(client, url, config.api_token.clone()),
            config.max_retries,
            config.retry_base_delay(),
        )))
    }
}

impl<C> Translate for Translator<C>
where
    C: InferenceCall<Response = Value>,
{
    #[instrument(level = "info", skip_all, fields(%source_lang, %target_lang))]
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ServiceError> {
        let payload = Self::payload(text, source_lang, target_lang);
        let reply = self.endpoint.call(&payload).await?;
        let translated = extract_text(&reply, REPLY_KEYS)?;
        debug!(chars = translated.chars().count(), "Translation generated");
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers every request with an uppercased echo of the input.
    struct Echo;

    impl InferenceCall for Echo {
        type Response = Value;

        async fn call(&self, payload: &Value) -> Result<Value, ServiceError> {
            let text = payload["inputs"].as_str().unwrap_or_default().to_uppercase();
            let tag = format!(
                "{}>{}",
                payload["parameters"]["src_lang"].as_str().unwrap_or("?"),
                payload["parameters"]["tgt_lang"].as_str().unwrap_or("?")
            );
            Ok(json!([{"translation_text": format!("[{tag}] {text}")}]))
        }
    }

    #[test]
    fn test_payload_names_both_languages() {
        let payload = Translator::<Echo>::payload("Hello.", "en", "hi");
        assert_eq!(payload["inputs"], "Hello.");
        assert_eq!(payload["parameters"]["src_lang"], "en");
        assert_eq!(payload["parameters"]["tgt_lang"], "hi");
    }

    #[tokio::test]
    async fn test_translate_returns_reply_unchanged() {
        let t = Translator::new(Echo);
        let out = t.translate("it rained. roads closed.", "en", "hi").await.unwrap();
        // periods are untouched here; the pipeline maps them afterwards
        assert_eq!(out, "[en>hi] IT RAINED. ROADS CLOSED.");
    }

    #[test]
    fn test_from_config_respects_overrides() {
        let mut config = DigestConfig::default();
        config.translation.base_url = "http://localhost:8080/models/".to_string();
        let t = Translator::from_config(&config).unwrap();
        assert_eq!(
            t.endpoint.inner().url().as_str(),
            "http://localhost:8080/models/facebook/m2m100_418M"
        );
    }
}
