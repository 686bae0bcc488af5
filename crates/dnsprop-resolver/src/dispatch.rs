//! Fan-out of one lookup across many resolvers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dnsprop_core::{Lookup, ResolveResult, Status};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::ResultCache;
use crate::wire;

/// Default admission ceiling
pub const DEFAULT_MAX_PARALLEL: usize = 20;

/// Default timeout for a single exchange
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Most exchanges in flight at once; the effective ceiling never exceeds the server count
    pub max_parallel: usize,
    /// Timeout for one exchange, shortened by any call deadline
    pub per_query_timeout: Duration,
    /// Upper bound on the cache TTL of stored results; zero disables the cap
    pub max_cache_ttl: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_parallel: DEFAULT_MAX_PARALLEL,
            per_query_timeout: DEFAULT_QUERY_TIMEOUT,
            max_cache_ttl: Duration::ZERO,
        }
    }
}

/// Runs one lookup against a server list, consulting an optional cache.
#[derive(Clone)]
pub struct Dispatcher {
    config: DispatchConfig,
    cache: Option<Arc<dyn ResultCache>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher without a cache
    #[must_use]
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Attach a result cache shared with other dispatchers
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the admission ceiling
    #[must_use]
    pub fn max_parallel(mut self, max_parallel: usize) -> Self {
        self.config.max_parallel = max_parallel;
        self
    }

    /// Set the per-exchange timeout
    #[must_use]
    pub fn per_query_timeout(mut self, timeout: Duration) -> Self {
        self.config.per_query_timeout = timeout;
        self
    }

    /// Set the cache TTL cap
    #[must_use]
    pub fn max_cache_ttl(mut self, max: Duration) -> Self {
        self.config.max_cache_ttl = max;
        self
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Ask every server `lookup` and return one result per server.
    ///
    /// Results come back in completion order, not input order. Each
    /// exchange bounds itself by `min(per_query_timeout, time left before
    /// deadline)`, so the call returns shortly after `deadline` at worst.
    pub async fn resolve(
        &self,
        lookup: &Lookup,
        servers: &[String],
        deadline: Option<Instant>,
    ) -> Vec<ResolveResult> {
        if servers.is_empty() {
            return Vec::new();
        }

        let ceiling = self.config.max_parallel.clamp(1, servers.len());
        let gate = Arc::new(Semaphore::new(ceiling));
        debug!(
            name = %lookup.name,
            qtype = %lookup.record_type,
            dnssec = lookup.dnssec,
            servers = servers.len(),
            ceiling,
            "dispatching lookup"
        );

        let mut tasks = JoinSet::new();
        for server in servers {
            let gate = Arc::clone(&gate);
            let this = self.clone();
            let lookup = lookup.clone();
            let server = server.clone();
            tasks.spawn(async move {
                // The gate is never closed, so acquire only fails if it is dropped.
                let _permit = gate.acquire_owned().await.ok();
                this.resolve_one(&lookup, &server, deadline).await
            });
        }

        let mut results = Vec::with_capacity(servers.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => warn!(error = %e, "resolver task failed"),
            }
        }
        results
    }

    async fn resolve_one(
        &self,
        lookup: &Lookup,
        server: &str,
        deadline: Option<Instant>,
    ) -> ResolveResult {
        let key = lookup.cache_key(server);

        if let Some(cache) = &self.cache {
            if let Some(mut cached) = cache.get(&key) {
                if cached.is_fresh() {
                    debug!(server, key = %key, "cache hit");
                    cached.when = Utc::now();
                    return cached;
                }
            }
        }

        let mut result =
            wire::query(server, lookup, self.config.per_query_timeout, deadline).await;
        result.cache_ttl = cap_cache_ttl(result.cache_ttl, self.config.max_cache_ttl);

        if let Some(cache) = &self.cache {
            if result.status != Status::Error {
                cache.add(&key, result.clone(), result.cache_ttl);
            }
        }
        result
    }
}

/// Clamp `ttl` to `max` when `max` is set and `ttl` is zero or larger.
#[must_use]
pub fn cap_cache_ttl(ttl: Duration, max: Duration) -> Duration {
    if !max.is_zero() && (ttl.is_zero() || ttl > max) {
        max
    } else {
        ttl
    }
}
