//! Command-line interface definitions for News Digest.
//!
//! Every option is optional: anything left out falls back to the `--config`
//! file, and then to the built-in defaults in [`crate::config`]. Endpoint
//! settings can also come from environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the News Digest application.
///
/// # Examples
///
/// ```sh
/// # Defaults: toi_articles.json -> processed_articles.json, English -> Hindi
/// news_digest
///
/// # Explicit paths and a different target language
/// news_digest -i scraped.json -o out/bengali.json --target-lang bn
///
/// # Local inference server, two articles in flight, retry flaky calls
/// news_digest --summarizer-url http://localhost:8080/models \
///     --translator-url http://localhost:8080/models --concurrency 2 --max-retries 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input JSON file (an array of article objects) [default: toi_articles.json]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output JSON file, overwritten if present [default: processed_articles.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the summarization inference endpoint
    #[arg(long, env = "SUMMARIZER_URL")]
    pub summarizer_url: Option<String>,

    /// Summarization model id [default: t5-base]
    #[arg(long)]
    pub summarizer_model: Option<String>,

    /// Base URL of the translation inference endpoint
    #[arg(long, env = "TRANSLATOR_URL")]
    pub translator_url: Option<String>,

    /// Translation model id [default: facebook/m2m100_418M]
    #[arg(long)]
    pub translator_model: Option<String>,

    /// Bearer token for the inference endpoints
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Language of the article text [default: en]
    #[arg(long)]
    pub source_lang: Option<String>,

    /// Language to translate summaries into [default: hi]
    #[arg(long)]
    pub target_lang: Option<String>,

    /// Number of articles processed at once [default: 1]
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Retries per service call after a failure [default: 0]
    #[arg(long)]
    pub max_retries: Option<usize>,

    /// Per-request timeout in seconds [default: none]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Abort the run on the first failed article instead of skipping it
    #[arg(long)]
    pub fail_fast: bool,
}
