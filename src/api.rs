//! Inference endpoint calls with optional exponential backoff.
//!
//! Both model services are plain JSON-over-HTTP endpoints. This module owns
//! the transport; [`crate::services`] owns the request and response shapes.
//!
//! # Architecture
//!
//! - [`InferenceCall`]: core trait, one JSON payload in, one JSON value out
//! - [`HttpEndpoint`]: posts the payload to a URL with `reqwest`
//! - [`Retry`]: decorator that adds retry logic to any `InferenceCall`
//!
//! # Retry Strategy
//!
//! Retries are off unless `max_retries > 0`. When enabled:
//! - only transient failures are retried (see [`ServiceError::is_transient`])
//! - exponential backoff starting at `base_delay`
//! - maximum delay capped at 30 seconds
//! - random jitter (0-250ms) added to each delay

use crate::error::ServiceError;
use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Trait for a single call to an inference endpoint.
///
/// Implementors send a JSON payload and return the decoded JSON answer. This
/// abstraction lets decorators such as [`Retry`] wrap any transport.
#[allow(async_fn_in_trait)]
pub trait InferenceCall {
    /// The type of response returned by the endpoint.
    type Response;

    /// Send `payload` and wait for the answer.
    async fn call(&self, payload: &Value) -> Result<Self::Response, ServiceError>;
}

/// Wrapper that adds exponential backoff retry logic to any [`InferenceCall`].
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..max_jitter)
/// ```
pub struct Retry<T> {
    /// The underlying endpoint to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
    /// Upper bound of the random jitter added to each delay.
    max_jitter: StdDuration,
}

impl<T> Retry<T>
where
    T: InferenceCall,
{
    /// Create a new retry wrapper around an existing [`InferenceCall`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// let endpoint = HttpEndpoint::new(client, url, None);
    /// let retrying = Retry::new(endpoint, 3, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
            max_jitter: StdDuration::from_millis(250),
        }
    }

    pub fn with_jitter(mut self, max_jitter: StdDuration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    fn backoff(&self, attempt: usize) -> StdDuration {
        let exponent = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1u32 << exponent);
        delay.min(self.max_delay)
    }
}

impl<T> fmt::Debug for Retry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> InferenceCall for Retry<T>
where
    T: InferenceCall,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn call(&self, payload: &Value) -> Result<Self::Response, ServiceError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.call(payload).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries || !e.is_transient() {
                        if self.max_retries > 0 {
                            error!(
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                                elapsed_ms_total = total_dt.as_millis() as u64,
                                transient = e.is_transient(),
                                error = %e,
                                "call() giving up"
                            );
                        }
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=self.max_jitter.as_millis() as u64);
                    let delay = self.backoff(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "call() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// A JSON inference endpoint reached over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    url: Url,
    /// Sent as `Authorization: Bearer <token>` when present.
    token: Option<String>,
}

impl HttpEndpoint {
    pub fn new(client: Client, url: Url, token: Option<String>) -> Self {
        Self { client, url, token }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl InferenceCall for HttpEndpoint {
    type Response = Value;

    #[instrument(level = "debug", skip_all, fields(url = %self.url))]
    async fn call(&self, payload: &Value) -> Result<Self::Response, ServiceError> {
        let t0 = Instant::now();
        let mut request = self.client.post(self.url.clone()).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let dt = t0.elapsed();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                elapsed_ms = dt.as_millis() as u64,
                status = status.as_u16(),
                body = %truncate_for_log(&body, 300),
                "Inference call failed"
            );
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value = response.json::<Value>().await?;
        debug!(elapsed_ms = dt.as_millis() as u64, "Inference call succeeded");
        Ok(value)
    }
}

/// Build the shared HTTP client used by every endpoint.
pub fn build_client(timeout: Option<StdDuration>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
