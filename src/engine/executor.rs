use log::{debug, trace};
use tokio::time::sleep;

use super::retry_state::RetryState;
use crate::config::{Config, RetryOption};
use crate::error::RetryError;
use crate::task::Task;

/// Runs `task` until it succeeds, the retry predicate rejects its error, the
/// attempt limit is used up, or the cancellation handle fires.
///
/// `options` are applied in order over [`Config::default`].
pub async fn execute<T, I>(task: T, options: I) -> Result<(), RetryError>
where
    T: Task,
    I: IntoIterator<Item = RetryOption>,
{
    execute_with_config(&task, Config::from_options(options)).await
}

/// Same as [`execute`] with an already assembled config.
pub async fn execute_with_config<T>(task: &T, config: Config) -> Result<(), RetryError>
where
    T: Task + ?Sized,
{
    let cancellation = config.cancellation().clone();
    if let Some(reason) = cancellation.err() {
        log_state(RetryState::Cancelled, 0);
        return Err(RetryError::Cancelled(reason));
    }

    let limit = config.attempts();
    let mut attempt: u64 = 0;

    loop {
        log_state(RetryState::Invoking, attempt + 1);
        let err = match task.execute().await {
            Ok(()) => {
                log_state(RetryState::Succeeded, attempt + 1);
                return Ok(());
            }
            Err(err) => err,
        };
        attempt += 1;

        trace!("Retry loop attempt {} failed: {}", attempt, err);
        log_state(RetryState::Evaluating, attempt);
        if limit_reached(limit, attempt) {
            log_state(RetryState::ExhaustedAttempts, attempt);
            return Err(RetryError::AttemptsExhausted);
        }
        if !config.should_retry(&err) {
            log_state(RetryState::RejectedByPredicate, attempt);
            return Err(RetryError::Rejected(err));
        }

        // Callbacks see a u32 index; it saturates on absurdly long runs.
        let index = u32::try_from(attempt).unwrap_or(u32::MAX);
        let wait = config.next_delay(index, &err);
        config.notify_retry(index, wait, &err);

        trace!("Retry loop waiting {:?} before attempt {}", wait, attempt + 1);
        log_state(RetryState::Waiting, attempt);
        tokio::select! {
            biased;
            reason = cancellation.done() => {
                log_state(RetryState::Cancelled, attempt);
                return Err(RetryError::Cancelled(reason));
            }
            _ = sleep(wait) => {}
        }
    }
}

/// Whether `made` invocations use up a positive `limit`.
fn limit_reached(limit: i64, made: u64) -> bool {
    match u64::try_from(limit) {
        Ok(limit) if limit > 0 => made >= limit,
        _ => false,
    }
}

fn log_state(state: RetryState, attempt: u64) {
    if state.is_terminal() {
        debug!("Retry loop {} at attempt {}", state, attempt);
    } else {
        trace!("Retry loop {} at attempt {}", state, attempt);
    }
}
