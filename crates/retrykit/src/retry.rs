use crate::backoff::Backoff;
use crate::error::{BoxError, Canceled};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Drive `operation` to completion under the given backoff chain.
///
/// The operation is invoked repeatedly until it succeeds, the chain
/// returns stop, or `cancel` fires. Between attempts the driver sleeps
/// for the delay the chain computed; the sleep races the token, so
/// cancellation interrupts a long wait promptly. Cancellation is
/// cooperative: it never interrupts an in-flight invocation — the
/// operation receives a clone of the token to observe on its own — but
/// at most one invocation starts after cancellation is requested.
///
/// Returns the operation's value on success, a [`Canceled`] error if the
/// token fired first, and otherwise the final (possibly transformed)
/// error the chain returned alongside stop.
///
/// ```rust
/// use retrykit::prelude::*;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), retrykit::BoxError> {
/// let backoff = Exponential::new(Duration::from_millis(50))
///     .with_jitter_percent(10)
///     .with_max_retries(3)
///     .with_retryable();
///
/// let status = retrykit::retry(&CancellationToken::new(), backoff, |_cancel| async {
///     match fetch().await {
///         // A 5xx is worth another attempt; anything else is final.
///         Ok(status) if status >= 500 => Err(retryable(format!("bad response: {status}"))),
///         Ok(status) => Ok(status),
///         Err(err) => Err(err),
///     }
/// })
/// .await?;
/// # Ok(())
/// # }
/// # async fn fetch() -> Result<u16, retrykit::BoxError> { Ok(200) }
/// ```
pub async fn retry<B, F, Fut, T>(
    cancel: &CancellationToken,
    backoff: B,
    mut operation: F,
) -> Result<T, BoxError>
where
    B: Backoff,
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, BoxError>>,
{
    let mut attempt: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(attempt, "canceled before attempt");
            return Err(Canceled.into());
        }

        attempt += 1;
        let err = match operation(cancel.clone()).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let (delay, err) = backoff.next(err);
        let Some(delay) = delay else {
            tracing::debug!(attempt, error = %err, "backoff exhausted");
            return Err(err);
        };

        tracing::trace!(attempt, ?delay, error = %err, "attempt failed, backing off");
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(attempt, "canceled during backoff sleep");
                return Err(Canceled.into());
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
