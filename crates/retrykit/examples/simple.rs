//! Bounded retry with Fibonacci spacing.
//!
//! Run with: `cargo run --example simple`

use retrykit::prelude::*;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let backoff = Fibonacci::new(Duration::from_millis(50)).with_max_retries(3);

    let mut attempt = 0;
    let result: Result<(), BoxError> = retry(&CancellationToken::new(), backoff, |_cancel| {
        attempt += 1;
        let attempt = attempt;
        async move {
            println!("attempt {attempt}");
            Err(retryable(std::io::Error::other("still flaky")))
        }
    })
    .await;

    match result {
        Ok(()) => println!("succeeded"),
        Err(err) => println!("gave up: {err}"),
    }
}
