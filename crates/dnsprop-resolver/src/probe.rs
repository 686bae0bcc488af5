//! Readiness probe: a tiny fan-out that checks any resolver answers at all.

use std::sync::Arc;
use std::time::Duration;

use dnsprop_core::Lookup;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::ResultCache;
use crate::dispatch::{DispatchConfig, Dispatcher};

/// Name queried by the probe
pub const PROBE_NAME: &str = "example.com";

/// Number of leading servers probed
pub const PROBE_SERVERS: usize = 3;

/// Ceiling on the whole probe
pub const PROBE_DEADLINE: Duration = Duration::from_millis(500);

/// Timeout of each probe exchange
pub const PROBE_QUERY_TIMEOUT: Duration = Duration::from_millis(400);

/// Probe verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    /// At least one resolver produced a DNS response
    Ok,
    /// Every probed resolver timed out or failed
    Degraded,
}

impl Readiness {
    /// True for [`Readiness::Ok`]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Probe the first few `servers` for an `A` record of `example.com`.
///
/// The probe finishes within `min(500ms, request_timeout)`. Any status
/// other than `timeout` or `error` counts as ready, so `nxdomain` or
/// `servfail` from a reachable resolver still passes.
pub async fn readiness(
    servers: &[String],
    request_timeout: Duration,
    cache: Option<Arc<dyn ResultCache>>,
) -> Readiness {
    let probed = &servers[..servers.len().min(PROBE_SERVERS)];
    let deadline = Instant::now() + PROBE_DEADLINE.min(request_timeout);

    let mut dispatcher = Dispatcher::new(DispatchConfig {
        per_query_timeout: PROBE_QUERY_TIMEOUT,
        max_cache_ttl: Duration::ZERO,
        ..DispatchConfig::default()
    });
    if let Some(cache) = cache {
        dispatcher = dispatcher.with_cache(cache);
    }

    let lookup = Lookup::new(PROBE_NAME, "A", false);
    let results = dispatcher.resolve(&lookup, probed, Some(deadline)).await;

    let verdict = if results.iter().any(|r| r.status.is_response()) {
        Readiness::Ok
    } else {
        Readiness::Degraded
    };
    debug!(servers = probed.len(), ?verdict, "readiness probe");
    verdict
}
