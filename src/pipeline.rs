//! Per-article orchestration: clean, summarize, post-process, translate.
//!
//! For every article with text content:
//!
//! ```text
//! content ─ clean_text ─ summarize ─┬─ fix_punctuation ──────────── summary
//!                                   └─ translate ─ terminator ───── translated_text
//! ```
//!
//! Both branches start from the same raw summary; the translation never sees
//! the capitalized text and the capitalization never touches the translation.
//!
//! # Failure policy
//!
//! [`FailurePolicy::Isolate`] (the default) records a failing article's error
//! in its `processing_error` field and moves on, so one bad record does not
//! throw away the rest of the run. [`FailurePolicy::Abort`] stops at the
//! first failure and nothing is written.
//!
//! # Ordering
//!
//! With `concurrency > 1` several articles are in flight at once, but results
//! are applied in input order and the saved collection keeps its order.

use crate::cleaner::clean_text;
use crate::config::DigestConfig;
use crate::error::{DigestError, ServiceError};
use crate::models::Article;
use crate::punctuation::{apply_sentence_terminator, fix_punctuation};
use crate::services::{Summarize, Translate};
use crate::store;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// What to do when a service call fails for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Mark the article as failed and continue.
    #[default]
    Isolate,
    /// Stop the run; no output is written.
    Abort,
}

/// Results computed for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub summary: String,
    pub translated_text: String,
}

/// Counts for one pass over a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Skipped,
    Digested(Digest),
    Failed(ServiceError),
}

/// Runs articles through summarization and translation.
///
/// The services are constructed once by the caller and borrowed for every
/// article.
pub struct ArticlePipeline<S, T> {
    summarizer: S,
    translator: T,
    source_lang: String,
    target_lang: String,
    terminator: Option<String>,
    policy: FailurePolicy,
    concurrency: usize,
}

impl<S, T> ArticlePipeline<S, T>
where
    S: Summarize,
    T: Translate,
{
    /// Pipeline translating from `source_lang` to `target_lang`, sequential
    /// and isolating failures.
    pub fn new(
        summarizer: S,
        translator: T,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            summarizer,
            translator,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            terminator: None,
            policy: FailurePolicy::default(),
            concurrency: 1,
        }
    }

    /// Pipeline with languages, terminator, policy and concurrency from `config`.
    pub fn from_config(summarizer: S, translator: T, config: &DigestConfig) -> Self {
        let t = &config.translation;
        let policy = if config.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Isolate
        };
        Self::new(summarizer, translator, &t.source_lang, &t.target_lang)
            .with_terminator(t.terminator().map(str::to_string))
            .with_policy(policy)
            .with_concurrency(config.concurrency)
    }

    /// Replacement for `.` in translated text; `None` leaves it alone.
    pub fn with_terminator(mut self, terminator: Option<String>) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of articles in flight at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Summarize and translate one piece of raw article text.
    pub async fn digest(&self, content: &str) -> Result<Digest, ServiceError> {
        let cleaned = clean_text(content);
        let summary = self.summarizer.summarize(&cleaned).await?;
        let translated = self
            .translator
            .translate(&summary, &self.source_lang, &self.target_lang)
            .await?;

        Ok(Digest {
            summary: fix_punctuation(&summary),
            translated_text: apply_sentence_terminator(&translated, self.terminator.as_deref()),
        })
    }

    /// Process a single article in place.
    ///
    /// Returns `Ok(false)` and leaves the article untouched when it has no
    /// text content. On error the article is also left untouched.
    pub async fn process(&self, article: &mut Article) -> Result<bool, ServiceError> {
        let Some(content) = article.content() else {
            return Ok(false);
        };
        let Digest {
            summary,
            translated_text,
        } = self.digest(content).await?;
        article.set_results(summary, translated_text);
        Ok(true)
    }

    #[instrument(level = "debug", skip_all, fields(index = index))]
    async fn outcome(&self, index: usize, article: &Article) -> (usize, Outcome) {
        let Some(content) = article.content() else {
            if article.has_non_text_content() {
                warn!(index, "Article content is not a string; skipping");
            } else {
                debug!(index, "Article has no content; skipping");
            }
            return (index, Outcome::Skipped);
        };

        let t0 = Instant::now();
        match self.digest(content).await {
            Ok(digest) => {
                info!(
                    index,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Processed article"
                );
                (index, Outcome::Digested(digest))
            }
            Err(e) => {
                error!(index, error = %e, "Article processing failed");
                (index, Outcome::Failed(e))
            }
        }
    }

    /// Process every article of a collection in place.
    ///
    /// # Errors
    ///
    /// Only under [`FailurePolicy::Abort`]: the first failing article, as
    /// [`DigestError::Service`]. Articles are not modified in that case.
    #[instrument(level = "info", skip_all, fields(count = articles.len(), concurrency = self.concurrency))]
    pub async fn process_all(&self, articles: &mut [Article]) -> Result<RunStats, DigestError> {
        let mut outcomes = Vec::with_capacity(articles.len());
        {
            let mut in_flight = std::pin::pin!(
                stream::iter(articles.iter().enumerate())
                    .map(|(index, article)| self.outcome(index, article))
                    .buffered(self.concurrency)
            );

            while let Some((index, outcome)) = in_flight.next().await {
                match outcome {
                    Outcome::Failed(source) if self.policy == FailurePolicy::Abort => {
                        return Err(DigestError::Service { index, source });
                    }
                    outcome => outcomes.push(outcome),
                }
            }
        }

        let mut stats = RunStats {
            total: articles.len(),
            ..RunStats::default()
        };
        for (article, outcome) in articles.iter_mut().zip(outcomes) {
            match outcome {
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Digested(d) => {
                    article.set_results(d.summary, d.translated_text);
                    stats.processed += 1;
                }
                Outcome::Failed(e) => {
                    article.mark_failed(&e.to_string());
                    stats.failed += 1;
                }
            }
        }

        info!(
            total = stats.total,
            processed = stats.processed,
            skipped = stats.skipped,
            failed = stats.failed,
            "Completed article processing"
        );
        Ok(stats)
    }

    /// Load `input`, process every article, and write the result to `output`.
    ///
    /// Nothing is written unless loading and processing both succeed.
    #[instrument(level = "info", skip_all, fields(input = %input.display(), output = %output.display()))]
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunStats, DigestError> {
        let mut articles = store::load(input).await?;
        let stats = self.process_all(&mut articles).await?;
        store::save(output, &articles).await?;
        Ok(stats)
    }
}
