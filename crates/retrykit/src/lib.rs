#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Composable backoff and retry for async operations.
//!
//! `retrykit` separates *what to retry* from *how long to wait*:
//!
//! - **Base generators** ([`Constant`], [`Exponential`], [`Fibonacci`])
//!   compute the shape of the delay sequence and never stop on their own.
//! - **Decorators** layer bounds and noise over any inner backoff:
//!   random jitter (absolute or percent, symmetric or additive-only),
//!   retry-count limits, per-delay caps, total-time budgets, and a gate
//!   that only retries errors marked with [`retryable`].
//! - **The driver** ([`retry`]) turns a chain into timed attempts, with
//!   cancellation via [`tokio_util::sync::CancellationToken`]: a pending
//!   sleep is aborted promptly, while an in-flight operation is left to
//!   observe the token itself.
//!
//! # Examples
//!
//! Retry a flaky operation a few times with Fibonacci spacing:
//!
//! ```rust
//! use retrykit::prelude::*;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), retrykit::BoxError> {
//! let backoff = Fibonacci::new(Duration::from_millis(100))
//!     .with_jitter(Duration::from_millis(20))
//!     .with_max_retries(3)
//!     .with_retryable();
//!
//! let value = retrykit::retry(&CancellationToken::new(), backoff, |_cancel| async {
//!     match probe().await {
//!         Ok(value) => Ok(value),
//!         // Mark transient failures; anything unmarked stops the chain.
//!         Err(err) => Err(retryable(err)),
//!     }
//! })
//! .await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! # async fn probe() -> Result<u32, std::io::Error> { Ok(42) }
//! ```
//!
//! Domain-specific delay logic plugs in by implementing [`Backoff`] (or
//! wrapping a closure in [`BackoffFn`]) around an inner chain — see
//! `examples/custom_decorator.rs`.

pub mod backoff;
pub mod config;
pub mod error;

mod retry;

pub use backoff::{
    Backoff, BackoffExt, BackoffFn, CappedDuration, Constant, Exponential, Fibonacci, Jitter,
    JitterPercent, MaxDuration, MaxRetries, Retryable,
};
pub use config::RetryConfig;
pub use error::{BoxError, Canceled, RetryableError, is_retryable, retryable};
pub use retry::retry;

/// Convenient re-exports of the commonly used surface.
///
/// ```rust
/// use retrykit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backoff::{
        Backoff, BackoffExt, BackoffFn, Constant, Exponential, Fibonacci,
    };
    pub use crate::config::RetryConfig;
    pub use crate::error::{BoxError, Canceled, is_retryable, retryable};
    pub use crate::retry::retry;
}
