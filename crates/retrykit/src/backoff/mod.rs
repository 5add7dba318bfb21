//! The backoff capability and its combinators.
//!
//! A [`Backoff`] decides, after each failed attempt, whether to wait and
//! retry or to give up. Base generators ([`Constant`], [`Exponential`],
//! [`Fibonacci`]) compute the *shape* of the delay sequence and never
//! terminate on their own (except on arithmetic overflow); bounds and
//! noise are layered on through decorators so policies compose
//! orthogonally:
//!
//! ```rust
//! use retrykit::prelude::*;
//! use std::time::Duration;
//!
//! let backoff = Fibonacci::new(Duration::from_millis(250))
//!     .with_jitter(Duration::from_millis(50))
//!     .with_capped_duration(Duration::from_secs(10))
//!     .with_max_retries(5);
//! ```
//!
//! Each combinator wraps the receiver, so the decorator applied *last* is
//! consulted *first* by the driver. Order matters: capping before a
//! total-time limit keeps the remaining-time clamp predictable, and
//! jittering before a cap clips the noise at the cap while the reverse
//! lets the final value exceed the cap by up to the spread.

mod constant;
mod exponential;
mod fibonacci;
mod jitter;
mod limit;
mod retryable;

pub use constant::Constant;
pub use exponential::Exponential;
pub use fibonacci::Fibonacci;
pub use jitter::{Jitter, JitterPercent};
pub use limit::{CappedDuration, MaxDuration, MaxRetries};
pub use retryable::Retryable;

use crate::error::BoxError;
use std::time::Duration;

/// A policy deciding how long to wait after a failed attempt.
///
/// Each call to [`next`](Backoff::next) means "one more attempt has just
/// failed with this error; tell me what to do." Implementations may
/// ignore the error entirely (the base generators do) or inspect it
/// ([`Retryable`] and domain-specific decorators).
pub trait Backoff: Send + Sync {
    /// Consume the error from the attempt that just failed and decide
    /// what happens next.
    ///
    /// `Some(delay)` (including a zero delay) means wait that long and
    /// retry; `None` means stop retrying. The returned error is passed
    /// through — possibly transformed, never discarded — and is surfaced
    /// to the caller as the final failure when the chain stops.
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError);
}

impl<B: Backoff + ?Sized> Backoff for &B {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        (**self).next(err)
    }
}

impl<B: Backoff + ?Sized> Backoff for Box<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        (**self).next(err)
    }
}

/// A backoff expressed as a plain function.
///
/// Handy for tests and one-off middleware that does not warrant a named
/// type:
///
/// ```rust
/// use retrykit::{Backoff, BackoffFn};
/// use std::time::Duration;
///
/// let fixed = BackoffFn::new(|err| (Some(Duration::from_millis(10)), err));
/// let (delay, _) = fixed.next(Box::new(std::io::Error::other("oops")));
/// assert_eq!(delay, Some(Duration::from_millis(10)));
/// ```
pub struct BackoffFn<F>(F);

impl<F> BackoffFn<F>
where
    F: Fn(BoxError) -> (Option<Duration>, BoxError) + Send + Sync,
{
    /// Wrap `f` as a [`Backoff`].
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Backoff for BackoffFn<F>
where
    F: Fn(BoxError) -> (Option<Duration>, BoxError) + Send + Sync,
{
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        (self.0)(err)
    }
}

/// Fluent combinators for composing backoff chains.
///
/// Blanket-implemented for every [`Backoff`]. Each method wraps the
/// receiver in a decorator; see the [module docs](self) for how
/// composition order affects behavior.
pub trait BackoffExt: Backoff + Sized {
    /// Add a uniformly random offset in `[-spread, +spread)` to each
    /// delay, clamped at zero. A zero `spread` leaves delays untouched.
    fn with_jitter(self, spread: Duration) -> Jitter<Self> {
        Jitter::symmetric(spread, self)
    }

    /// Add a uniformly random offset in `[0, +spread)` to each delay —
    /// jitter that never reduces the wait.
    fn with_jitter_additive(self, spread: Duration) -> Jitter<Self> {
        Jitter::additive(spread, self)
    }

    /// Perturb each delay by `±percent%` of its pre-jitter value.
    /// `percent` is clamped to 100.
    fn with_jitter_percent(self, percent: u64) -> JitterPercent<Self> {
        JitterPercent::symmetric(percent, self)
    }

    /// Lengthen each delay by `0..+percent%` of its pre-jitter value.
    fn with_jitter_percent_additive(self, percent: u64) -> JitterPercent<Self> {
        JitterPercent::additive(percent, self)
    }

    /// Stop after `max` retries. `max` counts retries, not attempts, so
    /// the driver invokes the operation at most `max + 1` times.
    fn with_max_retries(self, max: u32) -> MaxRetries<Self> {
        MaxRetries::new(max, self)
    }

    /// Cap the magnitude of any single delay at `cap`. This bounds
    /// neither the number of retries nor the total elapsed time.
    fn with_capped_duration(self, cap: Duration) -> CappedDuration<Self> {
        CappedDuration::new(cap, self)
    }

    /// Stop once `timeout` has elapsed since this decorator was
    /// constructed, and clamp every delay to the remaining budget.
    /// Best-effort: it bounds the next sleep, not in-flight operation
    /// time.
    fn with_max_duration(self, timeout: Duration) -> MaxDuration<Self> {
        MaxDuration::new(timeout, self)
    }

    /// Stop immediately on errors that are not marked with
    /// [`retryable`](crate::retryable), unwrapping the mark before
    /// delegating inward.
    fn with_retryable(self) -> Retryable<Self> {
        Retryable::new(self)
    }
}

impl<B: Backoff> BackoffExt for B {}
