//! Check DNS propagation across many public resolvers at once.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use dnsprop::{Dispatcher, Lookup, LruResultCache};
//!
//! #[tokio::main]
//! async fn main() -> dnsprop::Result<()> {
//!     let name = dnsprop::validate::validate_domain_name("example.com")?;
//!     let servers = dnsprop::geo::default_resolvers();
//!
//!     let cache = Arc::new(LruResultCache::new(5000, Duration::from_secs(30)));
//!     let dispatcher = Dispatcher::default().with_cache(cache);
//!
//!     let results = dispatcher
//!         .resolve(&Lookup::new(name, "A", false), &servers, None)
//!         .await;
//!     for r in &results {
//!         println!("{} ({}): {}", r.server, r.region, r.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/dnsprop/0.3.0")]

// Re-export core types
pub use dnsprop_core::*;

// Re-export the engine
pub use dnsprop_resolver::{
    readiness, DispatchConfig, Dispatcher, LruResultCache, NoCache, Readiness, ResultCache,
};
pub use dnsprop_resolver::{cache, dispatch, probe, wire};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
