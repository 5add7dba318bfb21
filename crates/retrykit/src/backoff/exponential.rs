use super::Backoff;
use crate::error::BoxError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Generator that doubles the delay on every call.
///
/// The n-th call yields `base * 2^(n-1)`. The sequence is unbounded:
/// termination belongs to decorators such as
/// [`MaxRetries`](super::MaxRetries). If doubling would overflow the
/// nanosecond representation, the generator returns stop instead of
/// wrapping.
///
/// The attempt counter is atomic, so concurrent calls on a shared
/// instance are memory-safe; the resulting interleaved sequence is only
/// meaningful within a single retry sequence.
///
/// ```rust
/// use retrykit::{Backoff, Exponential};
/// use std::time::Duration;
///
/// let backoff = Exponential::new(Duration::from_millis(100));
/// let delays: Vec<_> = (0..4)
///     .map(|_| backoff.next(Box::new(std::io::Error::other("oops"))).0)
///     .collect();
/// assert_eq!(
///     delays,
///     vec![
///         Some(Duration::from_millis(100)),
///         Some(Duration::from_millis(200)),
///         Some(Duration::from_millis(400)),
///         Some(Duration::from_millis(800)),
///     ],
/// );
/// ```
#[derive(Debug)]
pub struct Exponential {
    base_nanos: u64,
    attempt: AtomicU32,
}

impl Exponential {
    /// Create an exponential backoff starting at `base`.
    pub fn new(base: Duration) -> Self {
        Self {
            base_nanos: u64::try_from(base.as_nanos()).unwrap_or(u64::MAX),
            attempt: AtomicU32::new(0),
        }
    }
}

impl Backoff for Exponential {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        // Saturate rather than wrap so an absurdly long sequence stays stopped.
        let attempt = self
            .attempt
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |a| {
                Some(a.saturating_add(1))
            })
            .unwrap_or_else(|previous| previous);

        let delay = 1u64
            .checked_shl(attempt)
            .and_then(|factor| self.base_nanos.checked_mul(factor))
            .map(Duration::from_nanos);
        (delay, err)
    }
}
