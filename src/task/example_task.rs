use crate::task::{BoxError, Task};
use async_trait::async_trait;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A task that fails a fixed number of times before it succeeds.
#[derive(Clone)]
pub struct FlakyTask {
    pub name: String,
    pub fails_until: usize,
    calls: Arc<AtomicUsize>,
}

impl FlakyTask {
    pub fn new(name: impl Into<String>, fails_until: usize) -> Self {
        Self {
            name: name.into(),
            fails_until,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A task that never succeeds.
    pub fn always_failing(name: impl Into<String>) -> Self {
        Self::new(name, usize::MAX)
    }

    /// Number of times `execute` has been called, shared across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Task for FlakyTask {
    async fn execute(&self) -> Result<(), BoxError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.fails_until {
            debug!("{} failing on call {}", self.name, call);
            Err(format!("{} failed on call {}", self.name, call).into())
        } else {
            debug!("{} succeeded on call {}", self.name, call);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flaky_task_fails_then_succeeds() {
        let task = FlakyTask::new("flaky", 2);
        assert!(task.execute().await.is_err());
        assert!(task.execute().await.is_err());
        assert!(task.execute().await.is_ok());
        assert_eq!(task.calls(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_the_counter() {
        let task = FlakyTask::always_failing("broken");
        let observer = task.clone();
        let _ = task.execute().await;
        assert_eq!(observer.calls(), 1);
    }
}
