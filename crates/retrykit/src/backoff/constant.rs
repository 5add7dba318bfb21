use super::Backoff;
use crate::error::BoxError;
use std::time::Duration;

/// Generator that returns the same delay on every call, forever.
///
/// Holds no mutable state, so a single instance is safe to share across
/// concurrent retry sequences.
///
/// ```rust
/// use retrykit::{Backoff, Constant};
/// use std::time::Duration;
///
/// let backoff = Constant::new(Duration::from_secs(1));
/// for _ in 0..5 {
///     let (delay, _) = backoff.next(Box::new(std::io::Error::other("oops")));
///     assert_eq!(delay, Some(Duration::from_secs(1)));
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    base: Duration,
}

impl Constant {
    /// Create a constant backoff yielding `base` on every call.
    pub fn new(base: Duration) -> Self {
        Self { base }
    }
}

impl Backoff for Constant {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        (Some(self.base), err)
    }
}
