use std::time::Duration;

use super::constants::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS};

/// Specifies the backoff strategy for retrying failed requests.
#[derive(Clone, Debug, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed(Duration),
    /// Uses an exponential delay between retries.
    /// The delay after failed attempt `i` (0-indexed) is `base * factor^i`, capped at `max`.
    Exponential {
        /// The delay after the first failed attempt.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries. `Duration::MAX` leaves the
        /// growth uncapped.
        max: Duration,
    },
}

impl Backoff {
    /// The pause that follows failed attempt `attempt` (0-indexed).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(d) => *d,
            Self::Exponential { base, factor, max } => {
                // Integral factors are applied in integer nanoseconds so doubling stays exact.
                let grown = if factor.fract() == 0.0 && (1.0..=f64::from(u32::MAX)).contains(factor) {
                    (*factor as u32)
                        .checked_pow(attempt)
                        .and_then(|m| base.checked_mul(m))
                } else {
                    let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
                    Duration::try_from_secs_f64(base.as_secs_f64() * factor.powi(exp)).ok()
                };
                grown.map_or(*max, |d| d.min(*max))
            }
        }
    }
}

/// Configuration for the automatic retry mechanism.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Enables or disables the retry mechanism. When disabled, exactly one attempt is made.
    pub enabled: bool,
    /// The total number of attempts, including the first one. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// The backoff strategy to use between attempts.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::Exponential {
                base: DEFAULT_BACKOFF_BASE,
                factor: 2.0,
                max: Duration::MAX,
            },
        }
    }
}

impl RetryConfig {
    /// A policy that makes a single attempt and never sleeps.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Uncapped exponential backoff doubling from `base`, with `max_attempts` total
    /// attempts: the pause before attempt `i + 1` is `base * 2^i`.
    #[must_use]
    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self {
            enabled: true,
            max_attempts,
            backoff: Backoff::Exponential {
                base,
                factor: 2.0,
                max: Duration::MAX,
            },
        }
    }

    /// Number of attempts this policy allows.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        if self.enabled {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    /// The pause taken before attempt `attempt` (0-indexed).
    ///
    /// `None` for the first attempt and for any attempt beyond the policy's limit,
    /// so no sleep ever follows the final failure.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.attempts() {
            return None;
        }
        Some(self.backoff.delay_after(attempt - 1))
    }

    /// Every pause this policy will take if all attempts fail, in order.
    #[must_use]
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.attempts())
            .filter_map(|i| self.delay_before(i))
            .collect()
    }
}

/// Defines how a single call interacts with the client's cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Always fetch live. Successful payloads are written to the cache, and the cache
    /// is consulted (within the staleness grace window) only once every attempt has
    /// failed. (Default)
    #[default]
    Fallback,
    /// Always fetch live and neither read from nor write to the cache.
    Bypass,
}
