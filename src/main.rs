//! # News Digest
//!
//! Summarizes a file of scraped news articles and translates each summary.
//!
//! ## Usage
//!
//! ```sh
//! news_digest -i toi_articles.json -o processed_articles.json --target-lang hi
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use clap::Parser;
use news_digest::cli::Cli;
use news_digest::config::DigestConfig;
use news_digest::error::{DigestError, StoreError};
use news_digest::pipeline::ArticlePipeline;
use news_digest::services::{Summarizer, Translator};
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.input, ?args.output, ?args.config, "Parsed CLI arguments");

    let config = match DigestConfig::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        source_lang = %config.translation.source_lang,
        target_lang = %config.translation.target_lang,
        concurrency = config.concurrency,
        fail_fast = config.fail_fast,
        "Configuration resolved"
    );

    // ---- Services, built once and shared by every article ----
    let summarizer = Summarizer::from_config(&config)?;
    let translator = Translator::from_config(&config)?;
    let pipeline = ArticlePipeline::from_config(summarizer, translator, &config);

    match pipeline.run(&config.input, &config.output).await {
        Ok(stats) => {
            let elapsed = start_time.elapsed();
            info!(
                ?elapsed,
                processed = stats.processed,
                skipped = stats.skipped,
                failed = stats.failed,
                "Execution complete"
            );
            if stats.failed > 0 {
                eprintln!(
                    "⚠️  {} of {} articles failed; see their \"processing_error\" field",
                    stats.failed, stats.total
                );
            }
            println!("Processed JSON saved to {}", config.output.display());
            Ok(())
        }
        Err(e) => {
            match &e {
                DigestError::Store(StoreError::NotFound { path }) => {
                    eprintln!("❌ Error: '{}' file not found.", path.display())
                }
                DigestError::Store(StoreError::Malformed { path, .. }) => {
                    eprintln!("❌ Error: Invalid JSON format in '{}'.", path.display())
                }
                other => eprintln!("❌ Error: {other}"),
            }
            error!(error = %e, "Run failed");
            Err(e.into())
        }
    }
}
