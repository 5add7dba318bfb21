use super::Backoff;
use crate::error::{BoxError, RetryableError, is_retryable};
use std::time::Duration;

/// Decorator that only retries errors marked with
/// [`retryable`](crate::retryable).
///
/// An unmarked error stops the chain immediately — the inner backoff is
/// never consulted, so counters further in do not move — and the error
/// is returned as-is. A marked error has its tag stripped before the
/// inner backoff sees it, which is also the error surfaced on final
/// failure. A mark buried deeper in a source chain is honored too; only
/// a top-level mark can be unwrapped, since a mid-chain value cannot be
/// moved out of its parent.
#[derive(Debug)]
pub struct Retryable<B> {
    inner: B,
}

impl<B: Backoff> Retryable<B> {
    /// Gate the inner backoff on the retryable mark.
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

impl<B: Backoff> Backoff for Retryable<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        match err.downcast::<RetryableError>() {
            Ok(marked) => self.inner.next(marked.into_inner()),
            Err(err) if is_retryable(&err) => self.inner.next(err),
            Err(err) => (None, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::BackoffFn;
    use crate::error::retryable;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn unmarked_errors_stop_without_consulting_inner() {
        let calls = AtomicUsize::new(0);
        let inner = BackoffFn::new(|err| {
            calls.fetch_add(1, Ordering::SeqCst);
            (Some(Duration::from_secs(1)), err)
        });
        let b = Retryable::new(&inner);

        let (delay, err) = b.next(Box::new(std::io::Error::other("fatal")));
        assert_eq!(delay, None);
        assert_eq!(err.to_string(), "fatal");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn marked_errors_are_unwrapped_before_delegation() {
        let inner = BackoffFn::new(|err: BoxError| {
            assert!(
                err.downcast_ref::<RetryableError>().is_none(),
                "inner backoff must see the unwrapped error",
            );
            assert!(err.downcast_ref::<std::io::Error>().is_some());
            (Some(Duration::from_secs(1)), err)
        });
        let b = Retryable::new(inner);

        let (delay, err) = b.next(retryable(std::io::Error::other("transient")));
        assert_eq!(delay, Some(Duration::from_secs(1)));
        assert_eq!(err.to_string(), "transient");
    }

    #[test]
    fn a_mark_buried_in_a_chain_still_retries() {
        #[derive(Debug, thiserror::Error)]
        #[error("wrapped")]
        struct Wrapped {
            #[source]
            source: BoxError,
        }

        let inner = BackoffFn::new(|err| (Some(Duration::from_secs(1)), err));
        let b = Retryable::new(inner);

        let buried: BoxError = Box::new(Wrapped {
            source: retryable(std::io::Error::other("transient")),
        });
        let (delay, err) = b.next(buried);
        assert_eq!(delay, Some(Duration::from_secs(1)));
        assert!(err.downcast_ref::<Wrapped>().is_some());
    }
}
