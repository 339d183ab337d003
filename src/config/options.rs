use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{Config, DelayStrategy, OnRetry, RetryIf, DEFAULT_DELAY};
use crate::cancel::Cancellation;
use crate::task::BoxError;

/// One change to a [`Config`], applied in the order the options are given.
pub struct RetryOption(Box<dyn FnOnce(&mut Config) + Send>);

impl RetryOption {
    fn new(apply: impl FnOnce(&mut Config) + Send + 'static) -> Self {
        Self(Box::new(apply))
    }

    /// An option that changes nothing.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn apply(self, config: &mut Config) {
        (self.0)(config)
    }
}

impl fmt::Debug for RetryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryOption")
    }
}

/// Maximum number of task invocations. Zero or negative retries until the task
/// succeeds or the cancellation handle fires. Default is 3.
pub fn attempts(limit: i64) -> RetryOption {
    RetryOption::new(move |c| c.attempts = limit)
}

/// Base wait between attempts. A zero delay is replaced by the 100ms default.
pub fn delay(delay: Duration) -> RetryOption {
    let delay = if delay.is_zero() { DEFAULT_DELAY } else { delay };
    RetryOption::new(move |c| c.delay = delay)
}

/// Upper bound honoured by [`capped_exponential_delay`](crate::delay::capped_exponential_delay).
/// Zero means no cap.
pub fn max_delay(max: Duration) -> RetryOption {
    RetryOption::new(move |c| c.max_delay = max)
}

/// Called after each failed attempt with `(attempt, upcoming wait, error)`,
/// right before the loop starts waiting. Must not block.
pub fn on_retry<F>(callback: F) -> RetryOption
where
    F: Fn(u32, Duration, &BoxError) + Send + Sync + 'static,
{
    let callback: OnRetry = Arc::new(callback);
    RetryOption::new(move |c| c.on_retry = callback)
}

/// Decides whether an error is worth another attempt. Returning `false`
/// ends the loop with that error.
pub fn retry_if<F>(predicate: F) -> RetryOption
where
    F: Fn(&BoxError) -> bool + Send + Sync + 'static,
{
    let predicate: RetryIf = Arc::new(predicate);
    RetryOption::new(move |c| c.retry_if = predicate)
}

/// Signal that aborts the loop before the first attempt or during a wait.
pub fn cancellation<C>(handle: C) -> RetryOption
where
    C: Cancellation + 'static,
{
    let handle: Arc<dyn Cancellation> = Arc::new(handle);
    RetryOption::new(move |c| c.cancellation = handle)
}

/// Strategy computing the wait before the next attempt. Default is
/// [`exponential_delay`](crate::delay::exponential_delay).
pub fn delay_strategy<F>(strategy: F) -> RetryOption
where
    F: Fn(u32, &BoxError, &Config) -> Duration + Send + Sync + 'static,
{
    let strategy: DelayStrategy = Arc::new(strategy);
    RetryOption::new(move |c| c.delay_strategy = strategy)
}
