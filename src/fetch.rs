//! HTTP fetching with fixed-delay retry.
//!
//! # Architecture
//!
//! - [`FetchAsync`]: core trait for retrieving a resource by URL
//! - [`HttpFetcher`]: `reqwest` implementation that only accepts `200 OK`
//! - [`RetryFetch`]: decorator that re-runs any [`FetchAsync`] on failure
//!
//! # Retry Strategy
//!
//! A failed attempt is followed by a fixed pause (3 seconds by default) and
//! another attempt, up to `max_retries` retries after the first request.

use crate::errors::{NewsError, Result};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Trait for async retrieval of a resource.
pub trait FetchAsync {
    /// Retrieve the body at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Plain HTTP GET client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl FetchAsync for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let t0 = Instant::now();
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NewsError::fetch(url, e))?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(NewsError::fetch(
                url,
                format!("status code expected 200 but was {}", status.as_u16()),
            ));
        }

        let body = res.bytes().await.map_err(|e| NewsError::fetch(url, e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched"
        );
        Ok(body.to_vec())
    }
}

/// Wrapper that retries any [`FetchAsync`] implementation after a fixed delay.
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: FetchAsync,
{
    /// # Example
    ///
    /// ```ignore
    /// let fetcher = RetryFetch::new(HttpFetcher::default(), 3, Duration::from_secs(3));
    /// let body = fetcher.fetch("https://news.yahoo.co.jp/rss").await?;
    /// ```
    pub fn new(inner: T, max_retries: usize, delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            delay,
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .finish()
    }
}

impl<T> FetchAsync for RetryFetch<T>
where
    T: FetchAsync,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(attempt, max = self.max_retries, error = %e, "fetch exhausted retries");
                        return Err(e);
                    }
                    warn!(
                        attempt,
                        max = self.max_retries,
                        delay = ?self.delay,
                        error = %e,
                        "fetch attempt failed; retrying"
                    );
                    sleep(self.delay).await;
                }
            }
        }
    }
}
