use super::Backoff;
use crate::error::BoxError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Decorator that stops after a fixed number of retries.
///
/// `max` counts *retries* — attempts after the first — so a driver using
/// this chain invokes the operation at most `max + 1` times. Once the
/// budget is spent the inner backoff is no longer consulted and the
/// counter no longer moves.
///
/// The counter is atomic: a single retry sequence is sequential, so this
/// is a safety net against a shared instance, not a coordination
/// mechanism.
#[derive(Debug)]
pub struct MaxRetries<B> {
    max: u32,
    attempt: AtomicU32,
    inner: B,
}

impl<B: Backoff> MaxRetries<B> {
    /// Allow `max` retries before stopping.
    pub fn new(max: u32, inner: B) -> Self {
        Self {
            max,
            attempt: AtomicU32::new(0),
            inner,
        }
    }
}

impl<B: Backoff> Backoff for MaxRetries<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        let allowed = self
            .attempt
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |attempt| {
                (attempt < self.max).then(|| attempt + 1)
            })
            .is_ok();
        if !allowed {
            return (None, err);
        }
        self.inner.next(err)
    }
}

/// Decorator capping the magnitude of any single delay.
///
/// A delay of zero or above `cap` is replaced by `cap`; a stop from the
/// inner backoff propagates. This bounds neither the number of retries
/// nor the total elapsed time — compose with [`MaxRetries`] or
/// [`MaxDuration`] for that.
#[derive(Debug)]
pub struct CappedDuration<B> {
    cap: Duration,
    inner: B,
}

impl<B: Backoff> CappedDuration<B> {
    /// Cap every delay at `cap`.
    pub fn new(cap: Duration, inner: B) -> Self {
        Self { cap, inner }
    }
}

impl<B: Backoff> Backoff for CappedDuration<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        let (delay, err) = self.inner.next(err);
        let Some(delay) = delay else {
            return (None, err);
        };

        let delay = if delay.is_zero() || delay > self.cap {
            self.cap
        } else {
            delay
        };
        (Some(delay), err)
    }
}

/// Decorator bounding the total time a backoff chain may run.
///
/// The clock starts when the decorator is constructed. Once `timeout`
/// has elapsed, every call returns stop without consulting the inner
/// backoff; before that, a zero or over-budget delay is clamped to the
/// remaining time. Best-effort budgeting: it bounds the *next sleep*,
/// not the time an in-flight operation may take.
#[derive(Debug)]
pub struct MaxDuration<B> {
    start: Instant,
    timeout: Duration,
    inner: B,
}

impl<B: Backoff> MaxDuration<B> {
    /// Stop the chain `timeout` after construction.
    pub fn new(timeout: Duration, inner: B) -> Self {
        Self {
            start: Instant::now(),
            timeout,
            inner,
        }
    }
}

impl<B: Backoff> Backoff for MaxDuration<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        let remaining = self
            .timeout
            .checked_sub(self.start.elapsed())
            .filter(|remaining| !remaining.is_zero());
        let Some(remaining) = remaining else {
            return (None, err);
        };

        let (delay, err) = self.inner.next(err);
        let Some(delay) = delay else {
            return (None, err);
        };

        let delay = if delay.is_zero() || delay > remaining {
            remaining
        } else {
            delay
        };
        (Some(delay), err)
    }
}
