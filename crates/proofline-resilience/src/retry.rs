// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry loop for primary mutations.
//!
//! Mobile networks produce timeouts and resets that look the same as a
//! permanent rejection from the caller's side. The executor gives every
//! write a small fixed budget of attempts, sleeping `base * attempt` between
//! them, and never sleeps after the last one.

use std::future::Future;
use std::time::Duration;

use proofline_core::outcome::NETWORK_ERROR_MESSAGE;
use proofline_core::{MutationOutcome, ProoflineError, StoreError};
use tracing::{debug, info, warn};

use crate::recording;

/// Default number of attempts per mutation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff unit.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1000);

/// Attempt budget and backoff unit for one executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    /// Creates a policy. A zero attempt count is raised to one.
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Delay slept after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE)
    }
}

/// A single failed attempt, normalized from whatever the collaborator produced.
///
/// Store writes fail with [`StoreError`] values while blob and network
/// collaborators raise [`ProoflineError`]; both convert into this type so the
/// retry loop sees one failure channel.
#[derive(Debug)]
pub enum AttemptError {
    /// Worth another attempt. The message may be absent.
    Transient { message: Option<String> },
    /// Retrying cannot help; returned to the caller immediately.
    Permanent(ProoflineError),
}

impl AttemptError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: Some(message.into()),
        }
    }
}

impl From<StoreError> for AttemptError {
    fn from(err: StoreError) -> Self {
        Self::Transient {
            message: err.message,
        }
    }
}

impl From<ProoflineError> for AttemptError {
    fn from(err: ProoflineError) -> Self {
        if err.is_permanent() {
            Self::Permanent(err)
        } else {
            Self::Transient {
                message: Some(err.to_string()),
            }
        }
    }
}

/// Runs mutations under a [`RetryPolicy`].
///
/// Holds no state between calls; every `execute` starts a fresh budget.
#[derive(Debug, Clone, Default)]
pub struct RetryingExecutor {
    policy: RetryPolicy,
}

impl RetryingExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `op` until it succeeds or the budget is spent, returning the
    /// caller-facing outcome.
    pub async fn execute<T, E, F, Fut>(&self, operation: &str, op: F) -> MutationOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<AttemptError>,
    {
        match self.run(operation, op).await {
            Ok(value) => MutationOutcome::success(value),
            Err(err) => MutationOutcome::from_error(&err),
        }
    }

    /// Like [`execute`](Self::execute) but keeps the typed error.
    ///
    /// Exhaustion yields [`ProoflineError::TransientWrite`] carrying the last
    /// attempt's message, or [`NETWORK_ERROR_MESSAGE`] when it had none.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, ProoflineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<AttemptError>,
    {
        let max_attempts = self.policy.max_attempts;
        let mut last_message: Option<String> = None;

        for attempt in 1..=max_attempts {
            recording::record_attempt(operation);
            debug!(operation, attempt, max_attempts, "attempting mutation");

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(operation, attempt, "mutation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => match Into::<AttemptError>::into(err) {
                    AttemptError::Permanent(err) => {
                        warn!(operation, attempt, error = %err, "mutation failed permanently");
                        return Err(err);
                    }
                    AttemptError::Transient { message } => {
                        warn!(
                            operation,
                            attempt,
                            max_attempts,
                            error = message.as_deref().unwrap_or(NETWORK_ERROR_MESSAGE),
                            "mutation attempt failed"
                        );
                        last_message = message;
                    }
                },
            }

            if attempt < max_attempts {
                let delay = self.policy.delay_for(attempt);
                debug!(operation, attempt, delay_ms = delay.as_millis() as u64, "backing off");
                tokio::time::sleep(delay).await;
            }
        }

        recording::record_exhausted(operation);
        Err(ProoflineError::TransientWrite {
            attempts: max_attempts,
            message: last_message.unwrap_or_else(|| NETWORK_ERROR_MESSAGE.to_string()),
        })
    }
}
