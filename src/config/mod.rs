use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::cancel::{Cancellation, Never};
use crate::delay;
use crate::task::BoxError;

pub mod options;
pub mod settings;

pub use options::RetryOption;
pub use settings::{RetrySettings, StrategyKind};

/// Base delay used when none (or a zero one) is supplied.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_ATTEMPTS: i64 = 3;

/// Called after a failed attempt, before the wait: `(attempt, wait, error)`.
pub type OnRetry = Arc<dyn Fn(u32, Duration, &BoxError) + Send + Sync>;
/// Returns `true` to keep retrying after `error`.
pub type RetryIf = Arc<dyn Fn(&BoxError) -> bool + Send + Sync>;
/// Computes the wait before the next attempt: `(attempt, error, config)`.
pub type DelayStrategy = Arc<dyn Fn(u32, &BoxError, &Config) -> Duration + Send + Sync>;

/// Settings for one run of the retry loop.
///
/// Built from [`Config::default`] plus a list of [`RetryOption`]s and
/// read-only once the loop starts, apart from the lazily computed backoff cap.
#[derive(Clone)]
pub struct Config {
    pub(crate) attempts: i64,
    pub(crate) delay: Duration,
    pub(crate) max_delay: Duration,
    pub(crate) delay_strategy: DelayStrategy,
    pub(crate) retry_if: RetryIf,
    pub(crate) on_retry: OnRetry,
    pub(crate) cancellation: Arc<dyn Cancellation>,
    backoff_cap: OnceLock<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
            max_delay: Duration::ZERO,
            delay_strategy: Arc::new(delay::exponential_delay),
            retry_if: Arc::new(always_retry),
            on_retry: Arc::new(ignore_retry),
            cancellation: Arc::new(Never),
            backoff_cap: OnceLock::new(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `options` in order over the defaults. Later options win.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = RetryOption>,
    {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }

    /// Attempt limit. Zero or negative means retry until success or cancellation.
    pub fn attempts(&self) -> i64 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Zero means no cap beyond overflow protection.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn cancellation(&self) -> &Arc<dyn Cancellation> {
        &self.cancellation
    }

    /// Largest shift the exponential strategy may apply to the base delay
    /// without leaving the signed 64-bit nanosecond range.
    ///
    /// Computed on first call and cached for the lifetime of this config.
    pub fn backoff_cap(&self) -> u32 {
        *self.backoff_cap.get_or_init(|| {
            let delay = if self.delay.is_zero() {
                DEFAULT_DELAY
            } else {
                self.delay
            };
            63u32.saturating_sub(bits_needed(delay_nanos(delay)))
        })
    }

    pub(crate) fn next_delay(&self, attempt: u32, err: &BoxError) -> Duration {
        (self.delay_strategy)(attempt, err, self)
    }

    pub(crate) fn should_retry(&self, err: &BoxError) -> bool {
        (self.retry_if)(err)
    }

    pub(crate) fn notify_retry(&self, attempt: u32, wait: Duration, err: &BoxError) {
        (self.on_retry)(attempt, wait, err)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("attempts", &self.attempts)
            .field("delay", &self.delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_cap", &self.backoff_cap.get())
            .finish_non_exhaustive()
    }
}

pub(crate) fn always_retry(_: &BoxError) -> bool {
    true
}

pub(crate) fn ignore_retry(_: u32, _: Duration, _: &BoxError) {}

/// Duration in nanoseconds, saturating at `u64::MAX`.
pub(crate) fn delay_nanos(delay: Duration) -> u64 {
    u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX)
}

/// `floor(log2(n)) + 1`: the number of binary digits needed to represent `n`.
/// Zero needs none.
fn bits_needed(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}
