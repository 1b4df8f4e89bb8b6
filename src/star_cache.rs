//! Single-slot star count cache with stale fallback.
//!
//! One entry exists process-wide. It is only written after a successful,
//! range-checked fetch, and is served past its TTL when upstream fails.
//! Two requests that both find the slot expired may both fetch; the later
//! write wins as long as its timestamp is not older.

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::StarCacheError;
use crate::github::GitHubApi;

pub const MAX_STARS: u64 = 1_000_000;
pub const STALE_REASON: &str = "Failed to fetch fresh data, using cached";

// Cache entry with timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarCacheEntry {
    pub count: u64,
    pub captured_at: DateTime<Utc>,
}

impl StarCacheEntry {
    fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.captured_at).to_std().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarLookup {
    /// Served from the slot without an upstream call.
    Fresh { count: u64, age: Duration },
    /// Fetched just now and stored.
    Refreshed { count: u64, fetched_at: DateTime<Utc> },
    /// Upstream failed; last known value.
    Stale {
        count: u64,
        age: Duration,
        reason: &'static str,
    },
}

impl StarLookup {
    pub fn count(&self) -> u64 {
        match self {
            StarLookup::Fresh { count, .. }
            | StarLookup::Refreshed { count, .. }
            | StarLookup::Stale { count, .. } => *count,
        }
    }

    pub fn is_fresh(&self) -> bool {
        !matches!(self, StarLookup::Stale { .. })
    }
}

pub struct StarCache {
    github: Arc<dyn GitHubApi>,
    owner: String,
    repo: String,
    ttl: Duration,
    slot: ArcSwapOption<StarCacheEntry>,
}

impl StarCache {
    pub fn new(github: Arc<dyn GitHubApi>, owner: String, repo: String, ttl: Duration) -> Self {
        Self {
            github,
            owner,
            repo,
            ttl,
            slot: ArcSwapOption::empty(),
        }
    }

    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn current(&self) -> Option<StarCacheEntry> {
        self.slot.load_full().map(|e| *e)
    }

    pub async fn get_stars(&self) -> Result<StarLookup, StarCacheError> {
        self.get_stars_at(Utc::now()).await
    }

    pub async fn get_stars_at(&self, now: DateTime<Utc>) -> Result<StarLookup, StarCacheError> {
        let cached = self.current();

        if let Some(entry) = cached {
            let age = entry.age(now);
            if age < self.ttl {
                debug!(count = entry.count, age_secs = age.as_secs(), "Star cache hit");
                return Ok(StarLookup::Fresh {
                    count: entry.count,
                    age,
                });
            }
        }

        debug!(repo = %self.repository(), "Star cache miss, fetching");
        match self.github.fetch_star_count(&self.owner, &self.repo).await {
            Ok(raw) => {
                // only whole numbers in 0..=MAX_STARS; floats and negatives have no u64 form
                let Some(count) = raw.as_u64().filter(|n| *n <= MAX_STARS) else {
                    warn!(count = %raw, "Suspicious star count received, cache left untouched");
                    return Err(StarCacheError::InvalidCount(raw));
                };
                let entry = StarCacheEntry {
                    count,
                    captured_at: now,
                };
                self.store(entry);
                Ok(StarLookup::Refreshed {
                    count: entry.count,
                    fetched_at: now,
                })
            }
            Err(e) => match cached {
                Some(entry) => {
                    warn!(error = %e, count = entry.count, "Star fetch failed, serving cached value");
                    Ok(StarLookup::Stale {
                        count: entry.count,
                        age: entry.age(now),
                        reason: STALE_REASON,
                    })
                }
                None => {
                    warn!(error = %e, "Star fetch failed with nothing cached");
                    Err(StarCacheError::Unavailable(e))
                }
            },
        }
    }

    // Overwrite the slot unless a concurrent refresh already stored something newer
    fn store(&self, entry: StarCacheEntry) {
        self.slot.rcu(|current| match current {
            Some(existing) if existing.captured_at > entry.captured_at => Some(Arc::clone(existing)),
            _ => Some(Arc::new(entry)),
        });
    }
}
