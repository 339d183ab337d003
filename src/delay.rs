//! Built-in delay strategies.
//!
//! Each strategy maps `(attempt, last error, config)` to the wait before the
//! next attempt. `attempt` starts at 1 for the wait after the first failure.

use std::time::Duration;

use crate::config::{delay_nanos, Config};
use crate::task::BoxError;

/// Waits the configured base delay every time.
pub fn constant_delay(_attempt: u32, _err: &BoxError, config: &Config) -> Duration {
    config.delay()
}

/// Doubles the base delay on every attempt: `delay * 2^attempt`.
///
/// The exponent stops growing at [`Config::backoff_cap`], so the result
/// saturates instead of overflowing. `max_delay` is not applied here.
pub fn exponential_delay(attempt: u32, _err: &BoxError, config: &Config) -> Duration {
    let shift = attempt.min(config.backoff_cap());
    let nanos = delay_nanos(config.delay()).checked_shl(shift).unwrap_or(u64::MAX);
    Duration::from_nanos(nanos)
}

/// [`exponential_delay`], clamped to `max_delay` when it is non-zero.
pub fn capped_exponential_delay(attempt: u32, err: &BoxError, config: &Config) -> Duration {
    let wait = exponential_delay(attempt, err, config);
    if config.max_delay().is_zero() {
        wait
    } else {
        wait.min(config.max_delay())
    }
}
