//! Per-IP request rate limiting for `/api/v1/*`, using a keyed token
//! bucket so each client IP gets its own independent quota.

use std::net::IpAddr;
use std::num::NonZeroU32;

use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};

use crate::config::RateLimitConfig;

/// A per-IP token bucket limiter.
pub struct Limiter {
    limiter: RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
}

impl Limiter {
    /// Build a limiter allowing `config.requests` requests per
    /// `config.window_s`-second window, per IP.
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        let requests = NonZeroU32::new(config.requests.max(1)).unwrap();
        let quota = Quota::with_period(std::time::Duration::from_secs(config.window_s.max(1)))
            .unwrap()
            .allow_burst(requests);

        Self {
            limiter: RateLimiter::dashmap(quota),
        }
    }

    /// Returns `true` if the request from `ip` is within quota (and is
    /// consumed), `false` if the caller should be rejected.
    #[must_use]
    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(requests: u32, window_s: u64) -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            requests,
            window_s,
        }
    }

    #[test]
    fn test_first_request_within_quota_is_allowed() {
        let limiter = Limiter::new(&config(2, 60));
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        assert!(limiter.check(ip));
    }

    #[test]
    fn test_requests_beyond_burst_are_rejected() {
        let limiter = Limiter::new(&config(1, 60));
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        assert!(limiter.check(ip));
        assert!(!limiter.check(ip));
    }

    #[test]
    fn test_distinct_ips_have_independent_quotas() {
        let limiter = Limiter::new(&config(1, 60));
        let a: IpAddr = "127.0.0.1".parse().unwrap();
        let b: IpAddr = "127.0.0.2".parse().unwrap();
        assert!(limiter.check(a));
        assert!(limiter.check(b));
        assert!(!limiter.check(a));
    }
}
