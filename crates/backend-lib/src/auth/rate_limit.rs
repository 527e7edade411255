// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Sliding-window request throttling per requester key.

use crate::clock::Clock;
use crate::config::RateLimitSettings;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request admitted; `remaining` further requests fit in the current window
    Allowed { remaining: u32 },
    /// Request denied; the oldest counted request leaves the window after `retry_after`
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Sliding-window rate limiter
///
/// Each key owns the timestamps of its admitted requests inside the trailing
/// window. Stale timestamps are dropped lazily when the key is checked again.
#[derive(Debug, Clone)]
pub struct RateGate {
    windows: Arc<DashMap<String, VecDeque<DateTime<Utc>>>>,
    window: Duration,
    max_requests: u32,
    clock: Arc<dyn Clock>,
}

impl RateGate {
    pub fn new(settings: &RateLimitSettings, clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(settings.window(), settings.max_requests, clock)
    }

    pub fn with_limits(window: Duration, max_requests: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            window,
            max_requests,
            clock,
        }
    }

    /// Admit or deny one request from `key`
    pub fn allow(&self, key: &str) -> bool {
        self.check(key).is_allowed()
    }

    /// Admit or deny one request from `key`, reporting the remaining budget
    pub fn check(&self, key: &str) -> RateDecision {
        let now = self.clock.now();
        // a window reaching past the representable range covers all history
        let cutoff = now
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        // The entry guard holds the shard lock, so evict-then-append is atomic per key.
        let mut stamps = self.windows.entry(key.to_string()).or_default();
        while stamps.front().is_some_and(|ts| *ts < cutoff) {
            stamps.pop_front();
        }

        let count = stamps.len() as u32;
        if count < self.max_requests {
            stamps.push_back(now);
            RateDecision::Allowed {
                remaining: self.max_requests - count - 1,
            }
        } else {
            let retry_after = stamps
                .front()
                .and_then(|oldest| oldest.checked_add_signed(self.window))
                .map(|leaves_at| leaves_at - now)
                .unwrap_or(self.window);
            RateDecision::Limited { retry_after }
        }
    }

    /// Number of keys currently holding a window record
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}
