//! Core types for the dnsprop propagation checker.
//!
//! This crate provides the foundational pieces shared by the resolver engine
//! and its front ends:
//!
//! - **Types**: [`ResolveResult`], [`Answer`], [`Status`], [`RecordType`], [`Lookup`]
//! - **Directory**: static region and coordinate data for well-known public resolvers
//! - **Validation**: domain name, record type, and server list checks
//! - **Errors**: [`DnspropError`] for everything that is rejected before a query is sent
//!
//! # Example
//!
//! ```rust,ignore
//! use dnsprop_core::{geo, validate, Lookup, RecordType};
//!
//! let name = validate::validate_domain_name("bücher.example")?;
//! let lookup = Lookup::new(name, RecordType::Aaaa.as_str(), false);
//! println!("{} resolvers known", geo::DIRECTORY.len());
//! ```

#![doc(html_root_url = "https://docs.rs/dnsprop-core/0.3.0")]

mod error;
pub mod geo;
pub mod server;
pub mod types;
pub mod validate;

pub use error::{DnspropError, Result};
pub use types::*;
