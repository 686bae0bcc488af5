//! # dnsprop-cli
//!
//! Command-line front end for the dnsprop propagation engine.
//!
//! ## Features
//!
//! - **Resolve**: one lookup fanned out across every configured resolver
//! - **Watch**: repeat a lookup until an expected value has propagated
//! - **Ready**: quick check that resolvers are reachable at all
//! - **Educational mode**: `--explain` describes what a command does
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod education;
pub mod output;

pub use cli::run;
