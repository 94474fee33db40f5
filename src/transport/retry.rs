//! Bounded retry for fallible async operations.

use log::warn;
use std::future::Future;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// How many times an operation is attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// A policy allowing `max_attempts` attempts in total. Zero is treated as one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// The error that ended a retried operation, with the number of attempts made.
#[derive(Debug)]
pub struct Retried<E> {
    pub attempts: u32,
    pub error: E,
}

/// Runs `attempt` until it succeeds, fails with an error `should_retry` rejects, or the
/// policy's attempt budget is spent. There is no delay between attempts.
///
/// `attempt` receives the 1-based attempt number.
pub async fn with_retry<T, E, F, Fut, P>(
    policy: RetryPolicy,
    should_retry: P,
    mut attempt: F,
) -> Result<T, Retried<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match attempt(attempts).await {
            Ok(value) => return Ok(value),
            Err(error) if should_retry(&error) && attempts < policy.max_attempts => {
                warn!(
                    "Attempt {}/{} failed, retrying",
                    attempts, policy.max_attempts
                );
            }
            Err(error) => return Err(Retried { attempts, error }),
        }
    }
}
