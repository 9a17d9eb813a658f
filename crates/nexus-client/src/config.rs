//! Client configuration types.

use std::time::Duration;

/// Token-bucket quotas applied before a lookup is started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Lookups allowed per caller per minute
    pub per_caller_per_minute: u32,

    /// Lookups allowed across all callers per window
    pub global_burst: u32,

    /// Window over which the global burst replenishes
    pub global_window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitConfig {
    /// 15 lookups per minute per caller, 200 per 15 minutes globally
    #[must_use]
    pub const fn new() -> Self {
        Self {
            per_caller_per_minute: 15,
            global_burst: 200,
            global_window: Duration::from_secs(15 * 60),
        }
    }

    /// Set the per-caller quota
    #[must_use]
    pub const fn per_caller_per_minute(mut self, limit: u32) -> Self {
        self.per_caller_per_minute = limit;
        self
    }

    /// Set the global quota and its window
    #[must_use]
    pub const fn global(mut self, burst: u32, window: Duration) -> Self {
        self.global_burst = burst;
        self.global_window = window;
        self
    }

    /// Time between two global tokens
    #[must_use]
    pub fn global_period(&self) -> Duration {
        self.global_window / self.global_burst.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quotas() {
        let config = RateLimitConfig::default();
        assert_eq!(config.per_caller_per_minute, 15);
        assert_eq!(config.global_burst, 200);
        assert_eq!(config.global_period(), Duration::from_millis(4500));
    }
}
