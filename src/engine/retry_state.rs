use std::fmt;

/// Where the retry loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Invoking,
    Evaluating,
    Waiting,
    Succeeded,
    RejectedByPredicate,
    ExhaustedAttempts,
    Cancelled,
}

impl RetryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryState::Invoking => "invoking",
            RetryState::Evaluating => "evaluating",
            RetryState::Waiting => "waiting",
            RetryState::Succeeded => "succeeded",
            RetryState::RejectedByPredicate => "rejected",
            RetryState::ExhaustedAttempts => "exhausted",
            RetryState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            RetryState::Invoking | RetryState::Evaluating | RetryState::Waiting
        )
    }
}

impl fmt::Display for RetryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
