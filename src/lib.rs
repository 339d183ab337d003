//! # Retries
//!
//! Run a fallible async task again and again until it works, with
//! configurable backoff and cooperative cancellation.
//!
//! ## Features
//!
//! - Attempt limits, or retry forever until cancelled
//! - Constant and exponential (overflow-safe) backoff
//! - Retry predicates to stop early on permanent errors
//! - A retry callback for observing each failed attempt
//! - Cancellation through a token or a deadline
//! - Retry settings loadable from JSON
//!
//! ## Example
//!
//! ```rust
//! use retries::{execute, options, BoxError, CancelHandle, RetryError};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let deadline = CancelHandle::with_timeout(Duration::from_secs(5));
//!
//!     let result = execute(
//!         || async { Err::<(), BoxError>("connection refused".into()) },
//!         vec![
//!             options::attempts(3),
//!             options::delay(Duration::from_millis(10)),
//!             options::cancellation(deadline),
//!             options::on_retry(|attempt, wait, err| {
//!                 println!("attempt {} failed: {}, retrying in {:?}", attempt, err, wait);
//!             }),
//!         ],
//!     )
//!     .await;
//!
//!     assert!(matches!(result, Err(RetryError::AttemptsExhausted)));
//! }
//! ```
//!
//! ## License
//!
//! Licensed under the MIT license.

pub mod cancel;
pub mod config;
pub mod delay;
pub mod engine;
pub mod error;
pub mod task;

pub use cancel::{CancelHandle, CancelReason, Cancellation, Never};
pub use config::{options, Config, RetryOption, RetrySettings, StrategyKind};
pub use delay::{capped_exponential_delay, constant_delay, exponential_delay};
pub use engine::{execute, execute_with_config, RetryState};
pub use error::RetryError;
pub use task::{BoxError, FlakyTask, Task};
