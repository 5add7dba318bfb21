//! Declarative retry configuration.
//!
//! [`RetryConfig`] is the serde-friendly form of a common decorator
//! chain, for callers that load retry policy from configuration rather
//! than composing it in code. Durations are millisecond-denominated
//! integers so the struct deserializes cleanly from JSON, TOML, or YAML.

use crate::backoff::{
    Backoff, CappedDuration, Exponential, JitterPercent, MaxDuration, MaxRetries, Retryable,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a standard exponential retry chain.
///
/// [`build`](RetryConfig::build) assembles, innermost first: an
/// [`Exponential`] generator, percent jitter, a per-delay cap, the retry
/// limit, an optional total-time budget, and optionally a
/// [`Retryable`] gate — so jitter noise is clipped by the cap and an
/// unmarked error stops the chain before any counter moves.
///
/// ```rust
/// use retrykit::RetryConfig;
///
/// let config: RetryConfig = serde_json::from_str(
///     r#"{ "max_retries": 5, "initial_delay_ms": 100 }"#,
/// )?;
/// let backoff = config.build();
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries (total attempts = 1 + `max_retries`).
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Cap on any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Optional total-time budget for the whole sequence, in
    /// milliseconds. The clock starts when [`build`](RetryConfig::build)
    /// is called.
    pub max_elapsed_ms: Option<u64>,
    /// Symmetric jitter as a percentage of each delay (0 disables).
    pub jitter_percent: u64,
    /// Only retry errors marked with [`retryable`](crate::retryable).
    pub retryable_only: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 60_000,
            max_elapsed_ms: None,
            jitter_percent: 10,
            retryable_only: false,
        }
    }
}

impl RetryConfig {
    /// Assemble the configured decorator chain.
    ///
    /// Stateful pieces (the generator, counters, the optional deadline)
    /// are created fresh, so the result is scoped to one retry sequence.
    pub fn build(&self) -> Box<dyn Backoff> {
        let mut backoff: Box<dyn Backoff> = Box::new(Exponential::new(Duration::from_millis(
            self.initial_delay_ms,
        )));
        if self.jitter_percent > 0 {
            backoff = Box::new(JitterPercent::symmetric(self.jitter_percent, backoff));
        }
        backoff = Box::new(CappedDuration::new(
            Duration::from_millis(self.max_delay_ms),
            backoff,
        ));
        backoff = Box::new(MaxRetries::new(self.max_retries, backoff));
        if let Some(budget_ms) = self.max_elapsed_ms {
            backoff = Box::new(MaxDuration::new(Duration::from_millis(budget_ms), backoff));
        }
        if self.retryable_only {
            backoff = Box::new(Retryable::new(backoff));
        }
        backoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;

    fn oops() -> BoxError {
        Box::new(std::io::Error::other("oops"))
    }

    #[test]
    fn defaults_match_the_documented_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 60_000);
        assert_eq!(config.max_elapsed_ms, None);
        assert_eq!(config.jitter_percent, 10);
        assert!(!config.retryable_only);
    }

    #[test]
    fn first_delay_reflects_the_initial_delay_and_jitter() {
        let backoff = RetryConfig::default().build();
        let (delay, _) = backoff.next(oops());
        let delay = delay.expect("retries remain");
        assert!(delay >= Duration::from_millis(450), "too short: {delay:?}");
        assert!(delay < Duration::from_millis(550), "too long: {delay:?}");
    }

    #[test]
    fn chain_stops_after_the_configured_retries() {
        let config = RetryConfig {
            max_retries: 2,
            jitter_percent: 0,
            ..RetryConfig::default()
        };
        let backoff = config.build();

        assert!(backoff.next(oops()).0.is_some());
        assert!(backoff.next(oops()).0.is_some());
        assert_eq!(backoff.next(oops()).0, None);
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: RetryConfig =
            serde_json::from_str(r#"{ "max_retries": 7, "retryable_only": true }"#)
                .expect("valid config");
        assert_eq!(config.max_retries, 7);
        assert!(config.retryable_only);
        assert_eq!(config.initial_delay_ms, 500);
    }
}
