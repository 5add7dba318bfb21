//! Injecting domain-specific delay logic.
//!
//! A decorator that honors a server-provided retry hint (the shape of an
//! HTTP `Retry-After` header) while delegating everything else to an
//! inner chain.
//!
//! Run with: `cargo run --example custom_decorator`

use retrykit::prelude::*;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Failure carrying an optional server hint for when to try again.
#[derive(Debug, thiserror::Error)]
#[error("status {status}")]
struct StatusError {
    status: u16,
    retry_after: Option<Duration>,
}

/// Use the hint when the server sent one; otherwise keep whatever the
/// inner chain computed.
struct WithRetryAfter<B>(B);

impl<B: Backoff> Backoff for WithRetryAfter<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        let hint = err
            .downcast_ref::<StatusError>()
            .and_then(|status| status.retry_after);
        let (delay, err) = self.0.next(err);
        match delay {
            Some(delay) => (Some(hint.unwrap_or(delay)), err),
            None => (None, err),
        }
    }
}

/// Stand-in for a real request: throttled, then flaky, then fine.
fn fake_request(attempt: u32) -> Result<&'static str, StatusError> {
    match attempt {
        0 => Err(StatusError {
            status: 429,
            retry_after: Some(Duration::from_millis(200)),
        }),
        1 => Err(StatusError {
            status: 503,
            retry_after: None,
        }),
        _ => Ok("hello"),
    }
}

#[tokio::main]
async fn main() {
    let backoff = WithRetryAfter(Exponential::new(Duration::from_millis(50)).with_max_retries(5));

    let mut attempt = 0;
    let result = retry(&CancellationToken::new(), backoff, |_cancel| {
        let current = attempt;
        attempt += 1;
        async move {
            match fake_request(current) {
                Ok(body) => Ok(body),
                Err(err) => {
                    println!("attempt {current}: {err}");
                    Err(Box::new(err) as BoxError)
                }
            }
        }
    })
    .await;

    match result {
        Ok(body) => println!("response: {body}"),
        Err(err) => println!("gave up: {err}"),
    }
}
