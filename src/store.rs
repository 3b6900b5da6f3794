//! Loading and saving article collections as JSON files.
//!
//! The input is the scraper's output: a JSON array of objects. The output is
//! the same array with result fields added, written so that Hindi and other
//! non-Latin text stays readable in the file:
//!
//! - non-ASCII characters are written literally, never `\u` escaped
//! - four-space indentation, one field per line
//! - object field order is kept exactly as loaded

use crate::error::StoreError;
use crate::models::ArticleCollection;
use crate::utils::{ensure_parent_dir, looks_truncated};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Read an article collection from `path`.
///
/// # Errors
///
/// - [`StoreError::NotFound`] when nothing exists at `path`
/// - [`StoreError::Malformed`] when the content is not valid JSON, or is valid
///   JSON but not an array of objects
/// - [`StoreError::Io`] for any other read failure
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Result<ArticleCollection, StoreError> {
    let bytes = fs::read(path).await.map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let articles: ArticleCollection = serde_json::from_slice(&bytes).map_err(|source| {
        if looks_truncated(&source) {
            warn!(error = %source, "Input ends early; was the scraper interrupted?");
        }
        StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(count = articles.len(), bytes = bytes.len(), "Loaded articles");
    Ok(articles)
}

/// Serialize `articles` the way they are written to disk.
pub fn to_pretty_json(articles: &ArticleCollection) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::with_capacity(4096);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    articles.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `articles` to `path`, replacing any existing file.
///
/// Missing parent directories are created first.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn save(path: &Path, articles: &ArticleCollection) -> Result<(), StoreError> {
    let json = to_pretty_json(articles)?;

    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = ensure_parent_dir(path).await {
        error!(error = %e, "Failed to create output directory");
        return Err(io_err(e));
    }

    fs::write(path, &json).await.map_err(io_err)?;
    info!(count = articles.len(), bytes = json.len(), "Wrote articles");
    Ok(())
}
