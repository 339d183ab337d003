use thiserror::Error;

use crate::cancel::CancelReason;
use crate::task::BoxError;

/// Why [`execute`](crate::execute) gave up.
#[derive(Debug, Error)]
pub enum RetryError {
    /// A positive attempt limit was reached without a success.
    ///
    /// The last task error is not wrapped; capture it through the
    /// retry callback if you need it.
    #[error("finished all attempts")]
    AttemptsExhausted,

    /// The retry predicate declined the task's error, which is returned as-is.
    #[error("{0}")]
    Rejected(BoxError),

    /// The cancellation handle fired before the first attempt or during a wait.
    #[error(transparent)]
    Cancelled(#[from] CancelReason),
}

impl RetryError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::AttemptsExhausted)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled(_))
    }

    /// The task error returned by the predicate rejection path, if any.
    pub fn into_task_error(self) -> Option<BoxError> {
        match self {
            RetryError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}
