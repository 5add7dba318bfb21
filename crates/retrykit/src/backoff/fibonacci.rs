use super::Backoff;
use crate::error::BoxError;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Generator following the Fibonacci sequence scaled by a base duration.
///
/// `f(1) = f(2) = base`, `f(n) = f(n-1) + f(n-2)`: for a 1s base the
/// delays run `1s, 1s, 2s, 3s, 5s, 8s, ...`. The sequence is unbounded;
/// once an addition would overflow the nanosecond representation, every
/// subsequent call returns stop.
///
/// The two-slot window is mutex-guarded, so concurrent calls on a shared
/// instance are memory-safe even though interleaving them across retry
/// sequences is not meaningful.
#[derive(Debug)]
pub struct Fibonacci {
    // (f(n-1), f(n)) in nanoseconds; None once the sequence has overflowed.
    window: Mutex<Option<(u64, u64)>>,
}

impl Fibonacci {
    /// Create a Fibonacci backoff starting at `base`.
    pub fn new(base: Duration) -> Self {
        let base_nanos = u64::try_from(base.as_nanos()).unwrap_or(u64::MAX);
        Self {
            window: Mutex::new(Some((0, base_nanos))),
        }
    }
}

impl Backoff for Fibonacci {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        let Some((previous, current)) = *window else {
            return (None, err);
        };

        let delay = Duration::from_nanos(current);
        *window = previous.checked_add(current).map(|sum| (current, sum));
        (Some(delay), err)
    }
}
