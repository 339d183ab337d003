//! Cooperative cancellation for the retry loop.
//!
//! The loop only needs two things from a cancellation source: whether it has
//! already fired, and a future that completes when it does. [`Cancellation`]
//! captures exactly that, so any signal can drive the loop. [`CancelHandle`]
//! is the stock implementation, built on tokio's `CancellationToken` plus an
//! optional deadline.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// The reason a cancellation source fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelReason {
    #[error("context canceled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[async_trait]
pub trait Cancellation: Send + Sync {
    /// `Some` once the source has fired. Never blocks.
    fn err(&self) -> Option<CancelReason>;

    /// Resolves when the source fires. Must be cancel-safe: dropping the
    /// future before it completes has no side effects.
    async fn done(&self) -> CancelReason;
}

/// A source that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

#[async_trait]
impl Cancellation for Never {
    fn err(&self) -> Option<CancelReason> {
        None
    }

    async fn done(&self) -> CancelReason {
        futures::future::pending().await
    }
}

/// Manual cancellation with an optional deadline.
///
/// Clones share the same token, so cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that fires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A handle cancelled together with `self`, which can also be cancelled
    /// on its own. Keeps the earlier of the two deadlines.
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let own = timeout.map(|t| Instant::now() + t);
        let deadline = match (self.deadline, own) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[async_trait]
impl Cancellation for CancelHandle {
    fn err(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            return Some(CancelReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    async fn done(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => CancelReason::Cancelled,
                _ = time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                CancelReason::Cancelled
            }
        }
    }
}
