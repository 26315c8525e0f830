//! DNS Resolution Module
//!
//! Resolves a domain name through a fixed chain:
//! - System resolver (getaddrinfo via thread pool), bounded by a timeout
//! - Raw recursive A then AAAA queries against an ordered server list,
//!   stopping at the first server that yields an address
//!
//! # Architecture
//!
//! The `Resolve` trait is the core abstraction. [`GaiResolver`] implements it
//! for the OS resolver and [`FallbackResolver`] for the whole chain, holding
//! the OS stage as an `Arc<dyn Resolve>` so it can be swapped out.
//!
//! # Example
//!
//! ```rust,ignore
//! use fallback_resolver::dns::resolve_ips;
//!
//! for ip in resolve_ips("example.com").await? {
//!     println!("Resolved: {}", ip);
//! }
//! ```

mod config;
mod fallback;
mod gai;
pub mod message;
mod resolve;
pub mod transport;

pub use config::{ResolverConfig, DEFAULT_SERVERS};
pub use fallback::{resolve_ips, FallbackResolver};
pub use gai::GaiResolver;
pub use resolve::{Addrs, Name, Resolve, Resolving};
