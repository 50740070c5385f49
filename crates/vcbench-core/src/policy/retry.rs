//! Retrying wrapper around an issuance service, with jittered exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::error::IssuanceError;
use crate::exchange::{ExchangeHandle, ExchangeState};
use crate::offer::CredentialOffer;
use crate::service::IssuanceService;

/// How many times, and how patiently, a [`RetryingService`] retries.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles with every further retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay, jitter included.
    pub max_delay: Duration,
    /// Random extra delay as a fraction of the computed one (0.0 = none, at most 1.0).
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (1-based), before jitter.
    /// `None` once the retries are used up.
    pub fn backoff(&self, retry: u32) -> Option<Duration> {
        if retry == 0 || retry > self.max_retries {
            return None;
        }
        let factor = 2u32.saturating_pow(retry - 1);
        Some(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }

    /// Stretch `delay` by a random share of up to `jitter`, capped at `max_delay`.
    pub fn jittered<R: Rng>(&self, delay: Duration, rng: &mut R) -> Duration {
        if self.jitter.is_nan() || self.jitter <= 0.0 {
            return delay;
        }
        let extra = delay.mul_f64(rng.gen_range(0.0..=self.jitter.min(1.0)));
        (delay + extra).min(self.max_delay)
    }
}

/// Wraps an [`IssuanceService`] and retries calls that fail with a retryable error.
///
/// Service (non-success status) and decode errors pass through untouched.
pub struct RetryingService<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: IssuanceService> RetryingService<S> {
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn wait_before_retry(&self, attempt: u32, op: &str, err: &IssuanceError) -> bool {
        match self.config.backoff(attempt) {
            Some(base) => {
                let delay = self.config.jittered(base, &mut rand::thread_rng());
                tracing::warn!(
                    attempt,
                    op,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    endpoint = %self.inner.endpoint(),
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
                true
            }
            None => {
                tracing::error!(
                    attempt,
                    op,
                    error = %err,
                    endpoint = %self.inner.endpoint(),
                    "max retries exceeded"
                );
                false
            }
        }
    }
}

#[async_trait]
impl<S: IssuanceService> IssuanceService for RetryingService<S> {
    async fn submit(&self, offer: &CredentialOffer) -> Result<ExchangeHandle, IssuanceError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.inner.submit(offer).await {
                Err(e) if e.is_retryable() => {
                    if !self.wait_before_retry(attempt, "submit", &e).await {
                        return Err(e);
                    }
                }
                other => return other,
            }
        }
    }

    async fn status(&self, handle: &ExchangeHandle) -> Result<ExchangeState, IssuanceError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.inner.status(handle).await {
                Err(e) if e.is_retryable() => {
                    if !self.wait_before_retry(attempt, "status", &e).await {
                        return Err(e);
                    }
                }
                other => return other,
            }
        }
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
