use async_trait::async_trait;
use std::error::Error;
use std::future::Future;

pub mod example_task;

pub use example_task::FlakyTask;

/// Error type produced by a task. Opaque to the retry loop.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A unit of work that can be retried.
///
/// Every `Fn() -> impl Future<Output = Result<(), BoxError>>` closure whose
/// future owns its data is a task, so most callers never implement this trait
/// by hand.
#[async_trait]
pub trait Task: Send + Sync {
    async fn execute(&self) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut> Task for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn execute(&self) -> Result<(), BoxError> {
        (self)().await
    }
}
