//! # News Digest
//!
//! Batch post-processing for scraped news articles: each article's text is
//! cleaned, summarized by a sequence-to-sequence model, and the summary is
//! translated into another language. The augmented collection is written
//! back out as JSON.
//!
//! ## Architecture
//!
//! 1. **Load**: [`store::load`] reads a JSON array of article objects
//! 2. **Clean**: [`cleaner::clean_text`] normalizes whitespace and symbols
//! 3. **Summarize**: a [`services::Summarize`] implementation
//! 4. **Post-process**: [`punctuation::fix_punctuation`] on the summary,
//!    [`services::Translate`] then [`punctuation::apply_sentence_terminator`]
//!    on the same summary
//! 5. **Save**: [`store::save`] writes the collection with `summary` and
//!    `translated_text` added
//!
//! [`pipeline::ArticlePipeline`] drives steps 2-4 for every article.

pub mod api;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod punctuation;
pub mod services;
pub mod store;
pub mod utils;
