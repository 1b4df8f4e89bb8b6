use axum::http::HeaderMap;
use dashmap::DashMap;
use std::time::{Duration, Instant};

// Rate limit entry - tracks requests per client key
#[derive(Debug, Clone, Copy)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: Instant,
}

/// Fixed-window request counter keyed by client.
///
/// Bursts straddling a window boundary can briefly reach twice the nominal
/// rate; within any single window no more than `max_requests` get through.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn is_rate_limited(&self, key: &str) -> bool {
        self.is_rate_limited_at(key, Instant::now())
    }

    /// Records a request from `key` and reports whether it must be rejected.
    /// Rejected requests are not counted.
    pub fn is_rate_limited_at(&self, key: &str, now: Instant) -> bool {
        // entry() holds the shard lock, so check-and-increment is atomic per key
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now,
            });

        // first request or window expired? start a new one
        if entry.count == 0 || now > entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return false;
        }

        if entry.count >= self.max_requests {
            return true;
        }

        entry.count += 1;
        false
    }

    /// Drops keys whose window closed more than one full window ago.
    /// Returns how many were removed.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        let window = self.window;
        self.entries
            .retain(|_, entry| now <= entry.reset_at + window);
        before.saturating_sub(self.entries.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Client key for rate limiting: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, else a shared "unknown" bucket.
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or("unknown")
        .to_string()
}
