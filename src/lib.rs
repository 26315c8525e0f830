//! # fallback-resolver
//!
//! Domain name to IP address resolution that keeps working when the
//! operating system's resolver does not.
//!
//! A lookup first asks the OS resolver (`getaddrinfo`). If that fails, times
//! out or comes back empty, the name is queried directly with recursive A and
//! AAAA lookups against an ordered list of public DNS servers
//! (`8.8.8.8`, `114.114.114.114`, `1.1.1.1` by default), one server at a time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fallback_resolver::dns::resolve_ips;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ips = resolve_ips("example.com").await.unwrap();
//!     println!("{:?}", ips);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and error context helpers
//! - [`dns`] - Resolvers, configuration, DNS messages and transport

pub mod base;
pub mod dns;

pub use base::error::ResolveError;
pub use dns::{resolve_ips, FallbackResolver, ResolverConfig};
