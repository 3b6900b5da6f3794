//! Error types for loading, processing, and persisting article collections.
//!
//! Each layer has its own enum so callers can match on the failure they care
//! about (a missing input file is reported differently from a bad HTTP
//! status), while [`DigestError`] ties them together for a whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or writing an article collection on disk.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The input file does not exist.
    #[error("'{}' file not found", path.display())]
    NotFound { path: PathBuf },

    /// The input file is not a JSON array of objects.
    #[error("invalid JSON format in '{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Any other filesystem failure.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize articles: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures talking to the summarization or translation endpoints.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced a response (connect, TLS, timeout, body decode).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint responded with {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint answered 2xx but without the expected text field.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ServiceError {
    /// Whether trying the same request again could succeed.
    ///
    /// Transport failures, rate limiting (429) and server errors (5xx, which
    /// includes "model is loading") are transient; other client errors and
    /// unparseable answers are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Request(_) => true,
            ServiceError::Status { status, .. } => *status == 429 || *status >= 500,
            ServiceError::UnexpectedResponse(_) => false,
        }
    }
}

/// Invalid runtime configuration, detected before any article is read.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported {role} language '{code}'")]
    UnsupportedLanguage { role: &'static str, code: String },

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("cannot build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Anything that stops a run before the output file is written.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A service failure under the fail-fast policy.
    #[error("article {index} failed: {source}")]
    Service {
        index: usize,
        #[source]
        source: ServiceError,
    },
}
