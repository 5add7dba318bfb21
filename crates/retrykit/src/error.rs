//! Error currency and the retryable-error marker.
//!
//! The retry machinery threads a boxed error ([`BoxError`]) through the
//! backoff chain so decorators can inspect or transform the failure from
//! the last attempt. [`retryable`] tags an error as eligible for retry;
//! the tag is inert unless a [`Retryable`](crate::backoff::Retryable)
//! decorator is in the chain.

use std::error::Error as StdError;

/// Boxed error threaded through backoff chains and returned by the driver.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error returned by [`retry`](crate::retry) when the cancellation token
/// fires before the operation succeeds or the backoff chain gives up.
///
/// Downcast the driver's failure to distinguish cancellation from an
/// operation error:
///
/// ```rust
/// use retrykit::Canceled;
///
/// fn was_canceled(err: &retrykit::BoxError) -> bool {
///     err.downcast_ref::<Canceled>().is_some()
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("retry canceled")]
pub struct Canceled;

/// Marker wrapping an error that is eligible for retry.
///
/// Displays as `retryable: <inner>`. The wrapped error stays reachable
/// through [`source`](StdError::source), so code that walks error chains
/// looking for specific types still finds them through the tag.
///
/// Most callers want the [`retryable`] helper rather than constructing
/// this type directly.
#[derive(Debug, thiserror::Error)]
#[error("retryable: {source}")]
pub struct RetryableError {
    #[source]
    source: BoxError,
}

impl RetryableError {
    /// Wrap `err`, marking it as eligible for retry.
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self { source: err.into() }
    }

    /// Consume the marker, returning the wrapped error.
    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

/// Mark `err` as retryable.
///
/// Only meaningful when a [`Retryable`](crate::backoff::Retryable)
/// decorator is present in the chain; otherwise the mark is inert and
/// stop/continue behavior is driven purely by the rest of the chain.
///
/// ```rust
/// use retrykit::retryable;
///
/// let err = retryable(std::io::Error::other("connection reset"));
/// assert!(err.to_string().contains("retryable: "));
/// ```
pub fn retryable(err: impl Into<BoxError>) -> BoxError {
    Box::new(RetryableError::new(err))
}

/// Report whether `err` is, or wraps anywhere in its source chain, a
/// [`RetryableError`] mark.
pub fn is_retryable(err: &BoxError) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err.as_ref());
    while let Some(e) = current {
        if e.is::<RetryableError>() {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_marker_prefix() {
        let err = retryable(std::io::Error::other("oops"));
        assert!(err.to_string().contains("retryable: "));
        assert!(err.to_string().contains("oops"));
    }

    #[test]
    fn source_exposes_the_wrapped_error() {
        let marked = RetryableError::new(std::io::Error::other("oops"));
        let source = marked.source().expect("marker must expose its source");
        assert!(source.is::<std::io::Error>());
    }

    #[test]
    fn into_inner_returns_the_original() {
        let marked = RetryableError::new(std::io::Error::other("oops"));
        let inner = marked.into_inner();
        assert!(inner.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn detects_a_top_level_mark() {
        let err = retryable(std::io::Error::other("oops"));
        assert!(is_retryable(&err));

        let plain: BoxError = Box::new(std::io::Error::other("oops"));
        assert!(!is_retryable(&plain));
    }

    #[test]
    fn detects_a_mark_buried_in_a_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer {
            #[source]
            source: BoxError,
        }

        let buried: BoxError = Box::new(Outer {
            source: retryable(std::io::Error::other("oops")),
        });
        assert!(is_retryable(&buried));
    }

    #[test]
    fn canceled_is_distinct() {
        let err: BoxError = Canceled.into();
        assert!(err.downcast_ref::<Canceled>().is_some());
        assert!(!is_retryable(&err));
    }
}
