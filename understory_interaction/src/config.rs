// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Manager configuration and the update throttle.

use crate::types::DispatchPolicy;

/// Tunables for [`InteractionManager`](crate::InteractionManager).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    /// Maximum rate of the periodic hover/cursor pass, in passes per second.
    pub update_rate_hz: f64,
    /// Policy used for nodes that do not set one.
    pub default_policy: DispatchPolicy,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            update_rate_hz: 30.0,
            default_policy: DispatchPolicy::Auto,
        }
    }
}

impl InteractionConfig {
    /// Set [`update_rate_hz`](Self::update_rate_hz).
    pub fn with_update_rate(mut self, hz: f64) -> Self {
        self.update_rate_hz = hz;
        self
    }

    /// Set [`default_policy`](Self::default_policy).
    pub fn with_default_policy(mut self, policy: DispatchPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.update_rate_hz.is_finite() || self.update_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidUpdateRate(self.update_rate_hz));
        }
        Ok(())
    }
}

/// Rejected configuration.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The update rate must be finite and strictly positive.
    #[error("update rate must be finite and positive, got {0}")]
    InvalidUpdateRate(f64),
}

/// Rate limiter for the periodic update pass.
///
/// A pass is allowed when none ran yet, or when at least one period has elapsed since the last
/// allowed pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UpdateThrottle {
    rate_hz: f64,
    last_ms: Option<u64>,
}

impl UpdateThrottle {
    /// Throttle to `rate_hz` passes per second.
    pub fn new(rate_hz: f64) -> Self {
        Self {
            rate_hz,
            last_ms: None,
        }
    }

    /// Timestamp of the last allowed pass.
    pub fn last_ms(&self) -> Option<u64> {
        self.last_ms
    }

    /// Returns `true` (and records `now_ms`) if a pass may run at `now_ms`.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_ms {
            let elapsed = now_ms.saturating_sub(last) as f64;
            if elapsed * self.rate_hz / 1000.0 < 1.0 {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = InteractionConfig::default();
        assert_eq!(config.update_rate_hz, 30.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_rates() {
        for hz in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = InteractionConfig::default().with_update_rate(hz);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidUpdateRate(_))
            ));
        }
    }

    #[test]
    fn throttle_allows_one_pass_per_period() {
        // 20 Hz: one pass per 50 ms.
        let mut t = UpdateThrottle::new(20.0);
        assert!(t.ready(1000));
        assert!(!t.ready(1020));
        assert!(!t.ready(1049));
        assert!(t.ready(1050));
        assert_eq!(t.last_ms(), Some(1050));
        assert!(!t.ready(1060));
    }

    #[test]
    fn throttle_tolerates_clock_going_backwards() {
        let mut t = UpdateThrottle::new(30.0);
        assert!(t.ready(500));
        assert!(!t.ready(100));
    }
}
