//! Runtime configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults (the `Default` impls below)
//! 2. An optional YAML file passed with `--config`
//! 3. Individual command-line flags and their environment variables
//!
//! A complete file looks like:
//!
//! ```yaml
//! input: toi_articles.json
//! output: processed_articles.json
//! concurrency: 1
//! max_retries: 0
//! fail_fast: false
//! summarization:
//!   base_url: https://api-inference.huggingface.co/models
//!   model: t5-base
//!   task_prefix: "summarize: "
//!   generation:
//!     max_input_tokens: 512
//!     max_output_tokens: 150
//!     beam_width: 4
//!     length_penalty: 1.0
//!     no_repeat_ngram: 2
//!     early_stopping: true
//! translation:
//!   base_url: https://api-inference.huggingface.co/models
//!   model: facebook/m2m100_418M
//!   source_lang: en
//!   target_lang: hi
//!   sentence_terminators:
//!     mr: "।"
//! ```
//!
//! Entries under `sentence_terminators` are merged over the built-in table.

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_INPUT: &str = "toi_articles.json";
pub const DEFAULT_OUTPUT: &str = "processed_articles.json";
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "t5-base";
pub const DEFAULT_TRANSLATION_MODEL: &str = "facebook/m2m100_418M";

/// Language codes understood by the M2M100 translation models.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "am", "ar", "ast", "az", "ba", "be", "bg", "bn", "br", "bs", "ca", "ceb", "cs", "cy",
    "da", "de", "el", "en", "es", "et", "fa", "ff", "fi", "fr", "fy", "ga", "gd", "gl", "gu", "ha",
    "he", "hi", "hr", "ht", "hu", "hy", "id", "ig", "ilo", "is", "it", "ja", "jv", "ka", "kk",
    "km", "kn", "ko", "lb", "lg", "ln", "lo", "lt", "lv", "mg", "mk", "ml", "mn", "mr", "ms", "my",
    "ne", "nl", "no", "ns", "oc", "or", "pa", "pl", "ps", "pt", "ro", "ru", "sd", "si", "sk", "sl",
    "so", "sq", "sr", "ss", "su", "sv", "sw", "ta", "th", "tl", "tn", "tr", "uk", "ur", "uz", "vi",
    "wo", "xh", "yi", "yo", "zh", "zu",
];

/// Built-in sentence terminators for scripts that do not use the Latin full stop.
const DEFAULT_TERMINATORS: &[(&str, &str)] = &[
    ("bn", "।"),
    ("hi", "।"),
    ("ne", "।"),
    ("pa", "।"),
    ("ur", "۔"),
];

/// Generation settings forwarded to the summarization model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Input budget; longer prompts are cut silently.
    pub max_input_tokens: usize,
    pub max_output_tokens: usize,
    pub beam_width: u32,
    pub length_penalty: f64,
    /// Size of n-grams that may not repeat in the output.
    pub no_repeat_ngram: u32,
    /// Stop beam search once every beam has finished.
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_input_tokens: 512,
            max_output_tokens: 150,
            beam_width: 4,
            length_penalty: 1.0,
            no_repeat_ngram: 2,
            early_stopping: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SummarizationConfig {
    pub base_url: String,
    pub model: String,
    /// Instruction prepended to every input, e.g. `"summarize: "` for T5.
    pub task_prefix: String,
    pub generation: GenerationParams,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            task_prefix: "summarize: ".to_string(),
            generation: GenerationParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub base_url: String,
    pub model: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Extra or overriding `language -> terminator` entries.
    pub sentence_terminators: BTreeMap<String, String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_TRANSLATION_MODEL.to_string(),
            source_lang: "en".to_string(),
            target_lang: "hi".to_string(),
            sentence_terminators: BTreeMap::new(),
        }
    }
}

impl TranslationConfig {
    /// The terminator that replaces `.` in text translated into the target language.
    pub fn terminator(&self) -> Option<&str> {
        terminator_for(&self.target_lang, &self.sentence_terminators)
    }
}

/// Look up the sentence terminator for `lang`, consulting `overrides` first.
pub fn terminator_for<'a>(lang: &str, overrides: &'a BTreeMap<String, String>) -> Option<&'a str> {
    if let Some(t) = overrides.get(lang) {
        return Some(t.as_str());
    }
    DEFAULT_TERMINATORS
        .iter()
        .find(|(code, _)| *code == lang)
        .map(|(_, t)| *t)
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DigestConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Bearer token sent to both endpoints.
    pub api_token: Option<String>,
    /// Articles in flight at once; 1 processes strictly one after another.
    pub concurrency: usize,
    /// Extra attempts per service call after the first failure.
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
    pub timeout_secs: Option<u64>,
    /// Abort the whole run on the first failed article.
    pub fail_fast: bool,
    pub summarization: SummarizationConfig,
    pub translation: TranslationConfig,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            api_token: None,
            concurrency: 1,
            max_retries: 0,
            retry_base_delay_ms: 1000,
            timeout_secs: None,
            fail_fast: false,
            summarization: SummarizationConfig::default(),
            translation: TranslationConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Parse a YAML config file. Missing keys take their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        // an empty document means "all defaults"
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Build the configuration for a run from parsed command-line arguments.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        debug!(?config.input, ?config.output, concurrency = config.concurrency, "Resolved configuration");
        Ok(config)
    }

    /// Overlay flags that were given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = &cli.input {
            self.input = v.clone();
        }
        if let Some(v) = &cli.output {
            self.output = v.clone();
        }
        if let Some(v) = &cli.api_token {
            self.api_token = Some(v.clone());
        }
        if let Some(v) = cli.concurrency {
            self.concurrency = v;
        }
        if let Some(v) = cli.max_retries {
            self.max_retries = v;
        }
        if let Some(v) = cli.timeout_secs {
            self.timeout_secs = Some(v);
        }
        if cli.fail_fast {
            self.fail_fast = true;
        }
        if let Some(v) = &cli.summarizer_url {
            self.summarization.base_url = v.clone();
        }
        if let Some(v) = &cli.summarizer_model {
            self.summarization.model = v.clone();
        }
        if let Some(v) = &cli.translator_url {
            self.translation.base_url = v.clone();
        }
        if let Some(v) = &cli.translator_model {
            self.translation.model = v.clone();
        }
        if let Some(v) = &cli.source_lang {
            self.translation.source_lang = v.clone();
        }
        if let Some(v) = &cli.target_lang {
            self.translation.target_lang = v.clone();
        }
    }

    /// Reject settings that would only fail later, mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        check_language("source", &self.translation.source_lang)?;
        check_language("target", &self.translation.target_lang)?;
        endpoint_url(&self.summarization.base_url, &self.summarization.model)?;
        endpoint_url(&self.translation.base_url, &self.translation.model)?;
        Ok(())
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn check_language(role: &'static str, code: &str) -> Result<(), ConfigError> {
    if SUPPORTED_LANGUAGES.contains(&code) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedLanguage {
            role,
            code: code.to_string(),
        })
    }
}

/// Join a base URL and a model id (which may itself contain `/`).
pub fn endpoint_url(base_url: &str, model: &str) -> Result<Url, ConfigError> {
    let raw = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        model.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint { url: raw, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_generation_defaults() {
        let g = GenerationParams::default();
        assert_eq!(g.max_input_tokens, 512);
        assert_eq!(g.max_output_tokens, 150);
        assert_eq!(g.beam_width, 4);
        assert_eq!(g.length_penalty, 1.0);
        assert_eq!(g.no_repeat_ngram, 2);
        assert!(g.early_stopping);
    }

    #[test]
    fn test_default_paths_and_languages() {
        let c = DigestConfig::default();
        assert_eq!(c.input, PathBuf::from("toi_articles.json"));
        assert_eq!(c.output, PathBuf::from("processed_articles.json"));
        assert_eq!(c.translation.source_lang, "en");
        assert_eq!(c.translation.target_lang, "hi");
        assert_eq!(c.max_retries, 0);
        assert!(!c.fail_fast);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_supported_language_table_size() {
        assert_eq!(SUPPORTED_LANGUAGES.len(), 100);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "translation:\n  target_lang: ur\nsummarization:\n  generation:\n    beam_width: 2\n";
        let c = DigestConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(c.translation.target_lang, "ur");
        assert_eq!(c.translation.source_lang, "en");
        assert_eq!(c.summarization.generation.beam_width, 2);
        assert_eq!(c.summarization.generation.max_output_tokens, 150);
        assert_eq!(c.summarization.model, "t5-base");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(DigestConfig::from_yaml_str("").unwrap(), DigestConfig::default());
    }

    #[test]
    fn test_terminator_lookup() {
        let none = BTreeMap::new();
        assert_eq!(terminator_for("hi", &none), Some("।"));
        assert_eq!(terminator_for("ur", &none), Some("۔"));
        assert_eq!(terminator_for("fr", &none), None);

        let mut overrides = BTreeMap::new();
        overrides.insert("mr".to_string(), "।".to_string());
        overrides.insert("hi".to_string(), ".".to_string());
        assert_eq!(terminator_for("mr", &overrides), Some("।"));
        assert_eq!(terminator_for("hi", &overrides), Some("."));
    }

    #[test]
    fn test_terminator_languages_are_supported() {
        for (code, _) in DEFAULT_TERMINATORS {
            assert!(check_language("target", code).is_ok(), "{code} is not a supported language");
        }
    }

    #[test]
    fn test_fractional_length_penalty_from_yaml() {
        let g: GenerationParams = serde_yaml::from_str("length_penalty: 0.6").unwrap();
        assert_eq!(g.length_penalty, 0.6);
        assert_eq!(g.beam_width, 4);
    }

    #[test]
    fn test_endpoint_url_keeps_model_path() {
        let url = endpoint_url("https://api-inference.huggingface.co/models/", "facebook/m2m100_418M")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-inference.huggingface.co/models/facebook/m2m100_418M"
        );
        assert!(endpoint_url("not a url", "t5-base").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut c = DigestConfig::default();
        c.translation.target_lang = "klingon".to_string();
        assert!(matches!(
            c.validate(),
            Err(ConfigError::UnsupportedLanguage { role: "target", .. })
        ));

        let mut c = DigestConfig::default();
        c.concurrency = 0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidConcurrency)));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut c = DigestConfig::from_yaml_str("input: from_file.json\nconcurrency: 3\n").unwrap();
        let cli = Cli::parse_from([
            "news_digest",
            "--output",
            "out/processed.json",
            "--target-lang",
            "bn",
            "--fail-fast",
        ]);
        c.apply_cli(&cli);

        assert_eq!(c.input, PathBuf::from("from_file.json"));
        assert_eq!(c.output, PathBuf::from("out/processed.json"));
        assert_eq!(c.concurrency, 3);
        assert_eq!(c.translation.target_lang, "bn");
        assert!(c.fail_fast);
        assert_eq!(c.translation.terminator(), Some("।"));
    }

    #[test]
    fn test_resolve_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.yaml");
        std::fs::write(&path, "max_retries: 2\ntranslation:\n  target_lang: ne\n").unwrap();

        let cli = Cli::parse_from(["news_digest", "--config", path.to_str().unwrap()]);
        let c = DigestConfig::resolve(&cli).unwrap();
        assert_eq!(c.max_retries, 2);
        assert_eq!(c.translation.target_lang, "ne");
    }

    #[test]
    fn test_resolve_missing_config_file() {
        let cli = Cli::parse_from(["news_digest", "--config", "/definitely/not/here.yaml"]);
        assert!(matches!(
            DigestConfig::resolve(&cli),
            Err(ConfigError::Read { .. })
        ));
    }
}
