//! Fixed-window request limits per identity.

use crate::error::ApiError;
use dashmap::DashMap;
use std::time::{Duration, Instant};

// Expired windows are swept once the map grows past this many identities.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Counts requests per identity in fixed windows. In-memory, so limits are
/// per process.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
        }
    }

    /// Record one request for `identity`, failing once the limit for the
    /// current window is used up.
    pub fn check(&self, identity: &str) -> Result<(), ApiError> {
        self.check_at(identity, Instant::now()).map_err(|retry_after| {
            tracing::warn!(identity, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
            ApiError::TooManyRequests {
                retry_after: retry_after.as_secs_f64().ceil().max(1.0) as u64,
            }
        })
    }

    /// As [`check`](Self::check) at an explicit instant. The error is the time
    /// left until the window resets.
    pub fn check_at(&self, identity: &str, now: Instant) -> Result<(), Duration> {
        if self.windows.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }

        let mut entry = self.windows.entry(identity.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            return Err(self.window.saturating_sub(elapsed));
        }
        entry.count += 1;
        Ok(())
    }

    /// Drop windows that have already expired.
    pub fn prune(&self, now: Instant) {
        let window = self.window;
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
    }

    pub fn tracked_identities(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at("alice", now).is_ok());
        }
        let retry = limiter.check_at("alice", now + Duration::from_secs(15)).unwrap_err();
        assert_eq!(retry, Duration::from_secs(45));
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("alice", now).is_ok());
        assert!(limiter.check_at("alice", now).is_err());
        assert!(limiter.check_at("bob", now).is_ok());
        assert_eq!(limiter.tracked_identities(), 2);
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("alice", now).is_ok());
        assert!(limiter.check_at("alice", now + Duration::from_secs(59)).is_err());
        assert!(limiter.check_at("alice", now + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn test_check_maps_to_429() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        for _ in 0..10 {
            assert!(limiter.check("alice").is_ok());
        }
        match limiter.check("alice") {
            Err(ApiError::TooManyRequests { retry_after }) => {
                assert!((1..=60).contains(&retry_after))
            }
            other => panic!("expected rate limit error, got {other:?}"),
        }
    }

    #[test]
    fn test_prune_drops_expired_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(10));
        let now = Instant::now();

        limiter.check_at("old", now).unwrap();
        limiter.check_at("new", now + Duration::from_secs(8)).unwrap();
        limiter.prune(now + Duration::from_secs(12));

        assert_eq!(limiter.tracked_identities(), 1);
    }
}
