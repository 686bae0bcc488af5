//! Result cache shared by every fan-out.
//!
//! The container only bounds memory: it evicts least-recently-used entries
//! when full and drops entries after a coarse expiry. Whether a cached
//! result may still be served is decided by the dispatcher from the result's
//! own `queried_at` and `cache_ttl`.

use std::time::{Duration, Instant};

use dnsprop_core::ResolveResult;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use moka::Expiry;

/// What the dispatcher needs from a cache.
///
/// Implementations must be safe to call from many tasks at once.
pub trait ResultCache: Send + Sync {
    /// Last stored result for `key`, if the container still holds it
    fn get(&self, key: &str) -> Option<ResolveResult>;

    /// Store `value`; `ttl` bounds how long the container keeps it.
    fn add(&self, key: &str, value: ResolveResult, ttl: Duration);
}

/// Cache that stores nothing; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResultCache for NoCache {
    fn get(&self, _key: &str) -> Option<ResolveResult> {
        None
    }

    fn add(&self, _key: &str, _value: ResolveResult, _ttl: Duration) {}
}

#[derive(Clone)]
struct Entry {
    result: ResolveResult,
    expires_after: Duration,
}

struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.expires_after)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.expires_after)
    }
}

/// Bounded in-memory cache with LRU eviction and a default expiry.
#[derive(Clone)]
pub struct LruResultCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl LruResultCache {
    /// Create a cache holding at most `max_entries` results.
    ///
    /// No entry outlives `default_ttl`, whatever `ttl` it was added with.
    #[must_use]
    pub fn new(max_entries: u64, default_ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_live(default_ttl)
            .expire_after(EntryExpiry)
            .build();
        Self { inner, default_ttl }
    }

    /// Container-wide expiry
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Approximate number of live entries
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// True when no entries are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for LruResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruResultCache")
            .field("entries", &self.inner.entry_count())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl ResultCache for LruResultCache {
    fn get(&self, key: &str) -> Option<ResolveResult> {
        self.inner.get(key).map(|entry| entry.result)
    }

    fn add(&self, key: &str, value: ResolveResult, ttl: Duration) {
        let expires_after = if ttl.is_zero() { self.default_ttl } else { ttl };
        self.inner.insert(
            key.to_string(),
            Entry {
                result: value,
                expires_after,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsprop_core::Status;
    use std::sync::Arc;
    use std::thread;

    const KEY: &str = "8.8.8.8|example.com|A|dnssec=0";

    fn result(server: &str, ttl: Duration) -> ResolveResult {
        let mut r = ResolveResult::for_server(server);
        r.status = Status::Ok;
        r.cache_ttl = ttl;
        r
    }

    #[test]
    fn add_then_get() {
        let cache = LruResultCache::new(10, Duration::from_secs(60));
        cache.add(KEY, result("8.8.8.8", Duration::from_secs(10)), Duration::from_secs(10));

        let got = cache.get(KEY).expect("entry present");
        assert_eq!(got.server, "8.8.8.8");
        assert!(got.is_fresh());
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn container_expiry_drops_entries() {
        let cache = LruResultCache::new(10, Duration::from_millis(20));
        cache.add(KEY, result("1.1.1.1", Duration::from_millis(5)), Duration::from_millis(5));
        thread::sleep(Duration::from_millis(40));
        assert!(cache.get(KEY).is_none());
    }

    #[test]
    fn stale_entry_may_outlive_its_ttl_in_container() {
        // Zero ttl falls back to the container default, so the entry stays
        // while the result itself goes stale.
        let cache = LruResultCache::new(10, Duration::from_secs(60));
        cache.add(KEY, result("1.1.1.1", Duration::from_millis(30)), Duration::ZERO);
        thread::sleep(Duration::from_millis(60));

        let got = cache.get(KEY).expect("container still holds the entry");
        assert!(!got.is_fresh());
    }

    #[test]
    fn capacity_is_bounded() {
        let cache = LruResultCache::new(2, Duration::from_secs(60));
        for i in 0..5 {
            let key = format!("192.0.2.{i}|example.com|A|dnssec=0");
            cache.add(&key, result("192.0.2.1", Duration::from_secs(60)), Duration::from_secs(60));
        }
        assert!(cache.len() <= 2);
    }

    #[test]
    fn concurrent_access() {
        let cache = Arc::new(LruResultCache::new(1000, Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..50 {
                        let key = format!("{t}-{i}");
                        cache.add(&key, result("9.9.9.9", Duration::from_secs(60)), Duration::ZERO);
                        assert!(cache.get(&key).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 400);
    }

    #[test]
    fn no_cache_always_misses() {
        let cache = NoCache;
        cache.add(KEY, result("8.8.8.8", Duration::from_secs(10)), Duration::from_secs(10));
        assert!(cache.get(KEY).is_none());
    }
}
