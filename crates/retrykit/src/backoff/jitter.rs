use super::Backoff;
use crate::error::BoxError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Symmetric,
    Additive,
}

/// Decorator adding a random absolute offset to each delay.
///
/// Symmetric mode draws the offset from `[-spread, +spread)`; additive
/// mode from `[0, +spread)` so the wait is never shortened. Either way
/// the result is clamped at zero and a stop from the inner backoff
/// propagates untouched. A zero spread is a no-op.
///
/// The random source is entropy-seeded by default; use
/// [`seeded`](Jitter::seeded) for reproducible sequences in tests.
pub struct Jitter<B> {
    spread: Duration,
    mode: Mode,
    rng: Mutex<StdRng>,
    inner: B,
}

impl<B: Backoff> Jitter<B> {
    /// Jitter each delay by `[-spread, +spread)`.
    pub fn symmetric(spread: Duration, inner: B) -> Self {
        Self::with_mode(spread, Mode::Symmetric, inner)
    }

    /// Lengthen each delay by `[0, +spread)`.
    pub fn additive(spread: Duration, inner: B) -> Self {
        Self::with_mode(spread, Mode::Additive, inner)
    }

    fn with_mode(spread: Duration, mode: Mode, inner: B) -> Self {
        Self {
            spread,
            mode,
            rng: Mutex::new(StdRng::from_entropy()),
            inner,
        }
    }

    /// Replace the random source with one seeded from `seed`, making the
    /// jitter sequence deterministic.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }
}

impl<B: Backoff> Backoff for Jitter<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        let (delay, err) = self.inner.next(err);
        let Some(delay) = delay else {
            return (None, err);
        };

        let spread = self.spread.as_nanos() as i128;
        if spread == 0 {
            return (Some(delay), err);
        }

        let offset = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            match self.mode {
                Mode::Symmetric => rng.gen_range(-spread..spread),
                Mode::Additive => rng.gen_range(0..spread),
            }
        };
        (Some(offset_nanos(delay, offset)), err)
    }
}

/// Decorator perturbing each delay by a percentage of its value.
///
/// Symmetric mode scales the delay by a factor drawn from
/// `[1 - p/100, 1 + p/100)`; additive mode from `[1, 1 + p/100)`. The
/// percentage is always computed against the *pre-jitter* delay, never
/// compounded, and the result is clamped at zero. `percent` is clamped
/// to 100 at construction; zero is a no-op.
pub struct JitterPercent<B> {
    percent: u64,
    mode: Mode,
    rng: Mutex<StdRng>,
    inner: B,
}

impl<B: Backoff> JitterPercent<B> {
    /// Perturb each delay by `±percent%`.
    pub fn symmetric(percent: u64, inner: B) -> Self {
        Self::with_mode(percent, Mode::Symmetric, inner)
    }

    /// Lengthen each delay by `0..+percent%`.
    pub fn additive(percent: u64, inner: B) -> Self {
        Self::with_mode(percent, Mode::Additive, inner)
    }

    fn with_mode(percent: u64, mode: Mode, inner: B) -> Self {
        Self {
            percent: percent.min(100),
            mode,
            rng: Mutex::new(StdRng::from_entropy()),
            inner,
        }
    }

    /// Replace the random source with one seeded from `seed`.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }
}

impl<B: Backoff> Backoff for JitterPercent<B> {
    fn next(&self, err: BoxError) -> (Option<Duration>, BoxError) {
        let (delay, err) = self.inner.next(err);
        let Some(delay) = delay else {
            return (None, err);
        };

        if self.percent == 0 {
            return (Some(delay), err);
        }

        let top = self.percent as f64;
        let percent = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            match self.mode {
                Mode::Symmetric => rng.gen_range(-top..top),
                Mode::Additive => rng.gen_range(0.0..top),
            }
        };
        let scaled = delay.as_secs_f64() * (1.0 + percent / 100.0);
        (Some(Duration::from_secs_f64(scaled.max(0.0))), err)
    }
}

fn offset_nanos(delay: Duration, offset: i128) -> Duration {
    let nanos = (delay.as_nanos() as i128 + offset).max(0);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
