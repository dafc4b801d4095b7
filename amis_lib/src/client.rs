//! Retrying wrapper around a page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::fetch::PageFetcher;

/// Fetcher that retries transient failures with jittered exponential
/// backoff before giving up on a page.
///
/// Only errors the page client marks as retryable (transport failures,
/// 408, 429 and 5xx gateway statuses) are retried.
pub struct RetryingFetcher<F> {
    inner: F,
    retry: RetryConfig,
}

/// Retry limits, overridable through `AMIS_RETRY_*` variables.
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("AMIS_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("AMIS_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("AMIS_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

impl<F: PageFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    async fn fetch_page(&self, url: &str) -> Result<String, amis_api::Error> {
        let mut attempt = 0usize;
        loop {
            match self.inner.fetch_page(url).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !err.is_retryable() {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {:.1}s",
                        url,
                        attempt,
                        self.retry.max_retries,
                        err,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
