use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

pub const WINDOW_SECS: i64 = 60;

// Request counts per URL path, all paths share one expiry. Entries are never
// evicted: a path's stale count has to survive until its own next request, so
// the map grows with every distinct path callers send (404s included). Keep the
// whitelist on when the gateway is reachable by untrusted clients.
struct Window {
    counts: HashMap<String, u32>,
    resets_at: i64, // unix seconds
}

// Fixed-window limiter. The expiry is global: when it passes, only the path
// of the request that noticed is reset, other paths keep their old counts
// until their own next request.
pub struct RateLimiter {
    limit: u32, // 0 = unlimited
    window: Mutex<Window>,
}

impl RateLimiter {
    pub fn new(limit: u32) -> Self {
        Self::starting_at(limit, Utc::now().timestamp())
    }

    fn starting_at(limit: u32, now: i64) -> Self {
        Self {
            limit,
            window: Mutex::new(Window {
                counts: HashMap::new(),
                resets_at: now + WINDOW_SECS,
            }),
        }
    }

    // Count the request and tell whether it may go through
    pub fn try_acquire(&self, path: &str) -> bool {
        self.try_acquire_at(path, Utc::now().timestamp())
    }

    fn try_acquire_at(&self, path: &str, now: i64) -> bool {
        // every step leaves the window consistent, so a poisoned lock is still usable
        let mut guard = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        let Window { counts, resets_at } = &mut *guard;

        let count = counts.entry(path.to_string()).or_insert(0);
        *count = count.saturating_add(1);

        // window expired..? Reset this path only
        if now > *resets_at {
            *count = 1;
            *resets_at = now + WINDOW_SECS;
        }

        self.limit == 0 || *count <= self.limit
    }
}
