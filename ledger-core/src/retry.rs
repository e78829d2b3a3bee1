//! Retry and timeout wrappers for ledger operations
//!
//! [`RetryExecutor`] bounds latency with a deadline and improves the success
//! probability with a fixed-backoff retry loop. On success the wrapped
//! operation's result is returned untouched.
//!
//! A timed-out attempt is cancelled, not abandoned: `tokio::time::timeout`
//! drops the in-flight future, which releases any lock guard it holds.
//! Critical sections never await while mutating, so a cancelled attempt
//! either committed completely before its deadline or not at all.

use crate::{
    config::{RetryConfig, RetryPolicy},
    metrics::Metrics,
    Error, Result,
};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

/// Executes operations with a deadline and a bounded retry loop
#[derive(Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
    attempt_timeout: Duration,
    metrics: Option<Metrics>,
}

impl RetryExecutor {
    /// Create an executor; `attempt_timeout` bounds each attempt made by [`run`](Self::run)
    pub fn new(config: RetryConfig, attempt_timeout: Duration) -> Self {
        Self {
            config,
            attempt_timeout,
            metrics: None,
        }
    }

    /// Record retries in `metrics`
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Retry configuration in use
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Race `operation` against a timer
    pub async fn with_timeout<T, Fut>(
        &self,
        operation_name: &'static str,
        deadline: Duration,
        operation: Fut,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(deadline, operation).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Operation {} timed out after {:?}, attempt cancelled",
                    operation_name, deadline
                );
                Err(Error::Timeout {
                    operation: operation_name,
                    after_ms: deadline.as_millis() as u64,
                })
            }
        }
    }

    /// Invoke `operation` up to `max_attempts` times with a fixed delay
    ///
    /// Under [`RetryPolicy::Transient`] a permanent failure is returned as-is
    /// on the attempt that produced it. Under [`RetryPolicy::Blind`] every
    /// failure is retried. Running out of attempts yields
    /// [`Error::Exhausted`] wrapping the last failure.
    pub async fn with_retry<F, Fut, T>(&self, operation_name: &'static str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.config.delay();
                warn!(
                    "Retry attempt {}/{} for {} after {:?}",
                    attempt, max_attempts, operation_name, delay
                );
                if let Some(metrics) = &self.metrics {
                    metrics.retries_total.inc();
                }
                tokio::time::sleep(delay).await;
            }

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        info!(
                            "Operation {} succeeded on attempt {}/{}",
                            operation_name, attempt, max_attempts
                        );
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if !self.should_retry(&e) {
                        return Err(e);
                    }

                    warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt, max_attempts, operation_name, e
                    );
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.ok_or_else(|| {
            Error::Config(format!("{} ran out of attempts without an error", operation_name))
        })?;
        error!(
            "Operation {} exhausted {} attempts: {}",
            operation_name, max_attempts, last
        );
        Err(Error::Exhausted {
            attempts: max_attempts,
            last: Box::new(last),
        })
    }

    /// Retry loop around individually time-bounded attempts
    pub async fn run<F, Fut, T>(&self, operation_name: &'static str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let deadline = self.attempt_timeout;
        self.with_retry(operation_name, move || {
            self.with_timeout(operation_name, deadline, operation())
        })
        .await
    }

    fn should_retry(&self, error: &Error) -> bool {
        match self.config.policy {
            RetryPolicy::Blind => true,
            RetryPolicy::Transient => error.is_transient(),
        }
    }
}
