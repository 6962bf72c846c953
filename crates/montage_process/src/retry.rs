//! Bounded retries for external invocations.

use crate::{ExternalInvoker, Invocation, ProcessOutput, ProcessResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};

/// How often a failing invocation is attempted.
///
/// The default is a single attempt.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default)]
pub struct RetryPolicy {
    /// Total attempts, at least one
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    /// Base delay before the second attempt
    #[serde(default = "default_backoff_ms")]
    backoff_ms: u64,
    /// Upper bound on any single delay
    #[serde(default = "default_max_backoff_ms")]
    max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    2000
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy builder.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }
}

/// Run `invocation`, retrying transient failures within `policy`.
///
/// A non-zero exit counts as a failure here. Timeouts, spawn failures and
/// non-zero exits are retried; anything else fails immediately.
pub async fn invoke_with_retry(
    invoker: &dyn ExternalInvoker,
    invocation: &Invocation,
    policy: &RetryPolicy,
) -> ProcessResult<ProcessOutput> {
    let retries = policy.max_attempts.max(1) as usize - 1;
    let strategy = ExponentialBackoff::from_millis(policy.backoff_ms.max(1))
        .factor(2)
        .max_delay(Duration::from_millis(policy.max_backoff_ms))
        .map(jitter)
        .take(retries);

    let attempt = AtomicU32::new(0);
    Retry::spawn(strategy, || async {
        let current = attempt.fetch_add(1, Ordering::SeqCst) + 1;
        let result = match invoker.run(invocation).await {
            Ok(output) => output.check(invocation.program()),
            Err(e) => Err(e),
        };

        match result {
            Ok(output) => Ok(output),
            Err(e) if e.is_transient() && (current as usize) <= retries => {
                tracing::warn!(
                    program = %invocation.program(),
                    attempt = current,
                    max_attempts = retries + 1,
                    error = %e,
                    "Transient failure, will retry"
                );
                Err(RetryError::Transient {
                    err: e,
                    retry_after: None,
                })
            }
            Err(e) => Err(RetryError::Permanent(e)),
        }
    })
    .await
}
