//! Reconnect configuration and backoff calculation.
//!
//! Provides the portable, sync-only building blocks for reconnect timing.
//! The async scheduling itself lives in `beyond-socket`:
//!
//! - [`ReconnectPolicy`]: maximum attempts and base delay
//! - [`linear_delay`]: `base × attempt` backoff (attempt 1 waits one base delay)

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Default maximum reconnect attempts.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;
/// Default base reconnect delay in milliseconds.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 2000;

/// Reconnect parameters for one connection manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconnectPolicy {
    /// Maximum number of automatic reconnect attempts (default: 5).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay in ms; attempt `n` waits `n × base` (default: 2000).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_RECONNECT_ATTEMPTS
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            base_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

impl ReconnectPolicy {
    /// Whether `attempts` already made exhaust this policy.
    #[must_use]
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_attempts
    }

    /// Delay before the given 1-based attempt.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        linear_delay(Duration::from_millis(self.base_delay_ms), attempt)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backoff calculation
// ─────────────────────────────────────────────────────────────────────────────

/// Linear backoff: `base × attempt`.
///
/// `attempt` is 1-based, so the first retry waits exactly `base`. Attempt 0
/// yields a zero delay. Saturates instead of overflowing.
#[must_use]
pub fn linear_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- ReconnectPolicy --

    #[test]
    fn policy_defaults() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 2000);
    }

    #[test]
    fn policy_serde_defaults() {
        let policy: ReconnectPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, ReconnectPolicy::default());
    }

    #[test]
    fn policy_serde_camel_case() {
        let policy: ReconnectPolicy =
            serde_json::from_str(r#"{"maxAttempts":3,"baseDelayMs":100}"#).unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_ms, 100);
    }

    #[test]
    fn policy_exhaustion_boundary() {
        let policy = ReconnectPolicy {
            max_attempts: 3,
            base_delay_ms: 10,
        };
        assert!(!policy.is_exhausted(0));
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
        assert!(policy.is_exhausted(4));
    }

    #[test]
    fn zero_max_attempts_is_immediately_exhausted() {
        let policy = ReconnectPolicy {
            max_attempts: 0,
            base_delay_ms: 10,
        };
        assert!(policy.is_exhausted(0));
    }

    // -- linear_delay --

    #[test]
    fn linear_growth() {
        let base = Duration::from_millis(2000);
        assert_eq!(linear_delay(base, 1), Duration::from_millis(2000));
        assert_eq!(linear_delay(base, 2), Duration::from_millis(4000));
        assert_eq!(linear_delay(base, 3), Duration::from_millis(6000));
        assert_eq!(linear_delay(base, 5), Duration::from_millis(10_000));
    }

    #[test]
    fn attempt_zero_is_immediate() {
        assert_eq!(linear_delay(Duration::from_secs(2), 0), Duration::ZERO);
    }

    #[test]
    fn huge_attempt_saturates() {
        let delay = linear_delay(Duration::MAX, u32::MAX);
        assert_eq!(delay, Duration::MAX);
    }

    proptest::proptest! {
        #[test]
        fn delay_is_monotonic(base_ms in 1u64..10_000, attempt in 1u32..50) {
            let base = Duration::from_millis(base_ms);
            proptest::prop_assert!(linear_delay(base, attempt + 1) > linear_delay(base, attempt));
            proptest::prop_assert_eq!(
                linear_delay(base, attempt),
                Duration::from_millis(base_ms * u64::from(attempt))
            );
        }
    }

    #[test]
    fn policy_delay_for_matches_linear_delay() {
        let policy = ReconnectPolicy {
            max_attempts: 3,
            base_delay_ms: 250,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for(3), Duration::from_millis(750));
    }
}
