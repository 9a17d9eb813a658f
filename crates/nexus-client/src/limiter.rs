//! Rate limiting in front of the lookup entry point.

use crate::config::RateLimitConfig;
use governor::{DefaultDirectRateLimiter, DefaultKeyedRateLimiter, Quota, RateLimiter};
use nexus_core::{NexusError, Result};
use std::num::NonZeroU32;
use tracing::warn;

/// Per-caller and global token buckets.
///
/// The lookup engine itself keeps no counters; callers consult this before
/// starting a lookup.
pub struct LookupLimiter {
    per_caller: DefaultKeyedRateLimiter<String>,
    global: DefaultDirectRateLimiter,
}

impl Default for LookupLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl LookupLimiter {
    /// Create a limiter with the given quotas
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let caller_quota =
            Quota::per_minute(NonZeroU32::new(config.per_caller_per_minute).unwrap_or(NonZeroU32::MIN));

        let global_burst = NonZeroU32::new(config.global_burst).unwrap_or(NonZeroU32::MIN);
        let global_quota = Quota::with_period(config.global_period())
            .unwrap_or_else(|| Quota::per_second(global_burst))
            .allow_burst(global_burst);

        Self {
            per_caller: RateLimiter::keyed(caller_quota),
            global: RateLimiter::direct(global_quota),
        }
    }

    /// Take one token for `caller`, failing with `RateLimited` when exhausted.
    ///
    /// The caller's bucket is consulted first, so a caller over its own quota
    /// never drains the shared global bucket. The converse costs the caller:
    /// a request refused by the global bucket has already spent its caller
    /// token.
    pub fn check(&self, caller: &str) -> Result<()> {
        if self.per_caller.check_key(&caller.to_string()).is_err() {
            warn!(caller = caller, "per-caller lookup quota exhausted");
            return Err(NexusError::RateLimited { scope: "caller" });
        }

        if self.global.check().is_err() {
            warn!(caller = caller, "global lookup quota exhausted");
            return Err(NexusError::RateLimited { scope: "global" });
        }

        Ok(())
    }

    /// Drop per-caller state that has fully replenished
    pub fn prune(&self) {
        self.per_caller.retain_recent();
        self.per_caller.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::assert_ok;

    #[test]
    fn test_per_caller_quota() {
        let limiter = LookupLimiter::new(RateLimitConfig::new().per_caller_per_minute(2));

        assert_ok!(limiter.check("10.0.0.1"));
        assert_ok!(limiter.check("10.0.0.1"));
        assert!(matches!(
            limiter.check("10.0.0.1"),
            Err(NexusError::RateLimited { scope: "caller" })
        ));

        // A different caller has its own bucket
        assert_ok!(limiter.check("10.0.0.2"));
    }

    #[test]
    fn test_global_quota() {
        let limiter = LookupLimiter::new(
            RateLimitConfig::new().global(3, Duration::from_secs(900)),
        );

        for caller in ["a", "b", "c"] {
            assert_ok!(limiter.check(caller));
        }
        assert!(matches!(
            limiter.check("d"),
            Err(NexusError::RateLimited { scope: "global" })
        ));
        limiter.prune();
    }

    #[test]
    fn test_caller_over_quota_spares_global_bucket() {
        let limiter = LookupLimiter::new(
            RateLimitConfig::new()
                .per_caller_per_minute(1)
                .global(2, Duration::from_secs(900)),
        );

        assert_ok!(limiter.check("a"));
        for _ in 0..5 {
            assert!(matches!(
                limiter.check("a"),
                Err(NexusError::RateLimited { scope: "caller" })
            ));
        }

        // Only one global token was taken by "a"
        assert_ok!(limiter.check("b"));
        assert!(matches!(
            limiter.check("c"),
            Err(NexusError::RateLimited { scope: "global" })
        ));
    }
}
