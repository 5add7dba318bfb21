//! Composition-order behavior and whole-chain scenarios.

use retrykit::prelude::*;
use retrykit::{Backoff, RetryableError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn oops() -> BoxError {
    Box::new(std::io::Error::other("oops"))
}

#[test]
fn jitter_then_cap_clips_the_noise() {
    let b = Constant::new(Duration::from_secs(10))
        .with_jitter(Duration::from_secs(2))
        .with_capped_duration(Duration::from_secs(5));

    for _ in 0..200 {
        let (delay, _) = b.next(oops());
        assert_eq!(delay, Some(Duration::from_secs(5)));
    }
}

#[test]
fn cap_then_jitter_can_exceed_the_cap() {
    let b = Constant::new(Duration::from_secs(10))
        .with_capped_duration(Duration::from_secs(5))
        .with_jitter_additive(Duration::from_secs(2));

    for _ in 0..200 {
        let (delay, _) = b.next(oops());
        let delay = delay.expect("chain must not stop");
        assert!(delay >= Duration::from_secs(5));
        assert!(delay < Duration::from_secs(7));
    }
}

#[test]
fn delays_never_exceed_a_max_duration_budget() {
    let b = Exponential::new(Duration::from_millis(10))
        .with_capped_duration(Duration::from_millis(40))
        .with_max_duration(Duration::from_millis(120));

    let start = Instant::now();
    loop {
        // Sampled before the call: the clamp inside `next` sees an equal
        // or smaller remainder, so the delay must fit under this bound.
        let remaining = Duration::from_millis(120).saturating_sub(start.elapsed());
        let (delay, _) = b.next(oops());
        let Some(delay) = delay else { break };
        assert!(delay <= remaining, "delay {delay:?} exceeds budget {remaining:?}");
        std::thread::sleep(delay);
    }
    // Allow scheduler slack over the nominal 120ms budget.
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn driver_honors_the_total_time_budget() {
    let backoff = Constant::new(Duration::from_millis(20))
        .with_max_duration(Duration::from_millis(100));
    let calls = Arc::new(AtomicU32::new(0));

    let calls_in_op = Arc::clone(&calls);
    let started = Instant::now();
    let result: Result<(), _> = retry(&CancellationToken::new(), backoff, |_cancel| {
        let calls = Arc::clone(&calls_in_op);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(retryable(std::io::Error::other("oops")))
        }
    })
    .await;

    let err = result.expect_err("budget exhaustion surfaces the last error");
    assert_eq!(err.to_string(), "retryable: oops");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(calls.load(Ordering::SeqCst) >= 2, "budget allows several attempts");
}

/// Error carrying a server-provided retry hint, as an HTTP-aware caller
/// would produce from a `Retry-After` header.
#[derive(Debug, thiserror::Error)]
#[error("status {status}")]
struct StatusError {
    status: u16,
    retry_after: Option<Duration>,
}

/// Decorator that honors the hint when present and otherwise keeps the
/// inner chain's delay — the injection seam for domain-specific policy.
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

#[tokio::test]
async fn custom_decorator_overrides_the_delay_from_a_hint() {
    let backoff = WithRetryAfter(Exponential::new(Duration::from_millis(1)).with_max_retries(5));
    let calls = Arc::new(AtomicU32::new(0));

    let calls_in_op = Arc::clone(&calls);
    let body = retry(&CancellationToken::new(), backoff, |_cancel| {
        let calls = Arc::clone(&calls_in_op);
        async move {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 => Err(Box::new(StatusError {
                    status: 429,
                    retry_after: Some(Duration::from_millis(1)),
                }) as BoxError),
                1 => Err(Box::new(StatusError {
                    status: 500,
                    retry_after: None,
                }) as BoxError),
                _ => Ok("hello"),
            }
        }
    })
    .await
    .expect("third attempt succeeds");

    assert_eq!(body, "hello");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn config_built_chain_drives_to_exhaustion() {
    let config: RetryConfig = serde_json::from_str(
        r#"{ "max_retries": 2, "initial_delay_ms": 1, "jitter_percent": 0, "retryable_only": true }"#,
    )
    .expect("valid config");

    let calls = Arc::new(AtomicU32::new(0));
    let calls_in_op = Arc::clone(&calls);
    let result: Result<(), _> = retry(&CancellationToken::new(), config.build(), |_cancel| {
        let calls = Arc::clone(&calls_in_op);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(retryable(std::io::Error::other("oops")))
        }
    })
    .await;

    let err = result.expect_err("chain exhausts");
    assert!(
        err.downcast_ref::<RetryableError>().is_none(),
        "the retryable gate unwraps the mark before surfacing the error",
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
