//! Parallel DNS propagation engine.
//!
//! Asks many independent resolvers the same question at once and reports
//! what each one said.
//!
//! ```text
//! Dispatcher::resolve(lookup, servers, deadline)
//!   for each server (at most `max_parallel` at a time):
//!     cache hit and fresh -> cached result, `when` = now
//!     otherwise           -> wire::query (UDP, TCP on truncation)
//!                            -> classify -> cap cache TTL -> store
//!   -> results in completion order
//! ```
//!
//! Per-server problems never fail the call: they show up as a
//! [`Status`](dnsprop_core::Status) on that server's result.

#![doc(html_root_url = "https://docs.rs/dnsprop-resolver/0.3.0")]

pub mod cache;
pub mod dispatch;
mod error;
pub mod probe;
pub mod wire;

#[cfg(test)]
mod stub;

pub use cache::{LruResultCache, NoCache, ResultCache};
pub use dispatch::{DispatchConfig, Dispatcher};
pub use probe::{readiness, Readiness};
