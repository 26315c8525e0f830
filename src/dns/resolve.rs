//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` trait and supporting types that form
//! the foundation of the DNS abstraction layer.

use crate::base::error::ResolveError;
use std::{fmt, future::Future, net::IpAddr, net::SocketAddr, pin::Pin, sync::Arc};

/// A domain name to resolve into IP addresses.
///
/// The name is stored without its trailing dot, so `"example.com"` and
/// `"example.com."` compare equal. [`Name::as_str`] gives the form handed to
/// the OS resolver and [`Name::fqdn`] the fully-qualified form used in raw
/// DNS queries.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`], dropping a single trailing dot.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        let host: Box<str> = host.into();
        match host.strip_suffix('.') {
            Some(stripped) => Self {
                host: stripped.into(),
            },
            None => Self { host },
        }
    }

    /// View the hostname (no trailing dot) as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }

    /// The fully-qualified form, always ending in `.`.
    pub fn fqdn(&self) -> String {
        format!("{}.", self.host)
    }

    /// True for `""` and `"."`, which name nothing resolvable.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }

    /// Returns the address if the name is already an IP literal.
    pub fn ip_literal(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for an `Iterator` trait object over `SocketAddr`.
pub type Addrs = Box<dyn Iterator<Item = SocketAddr> + Send>;

/// Alias for the `Future` type returned by a DNS resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, ResolveError>> + Send>>;

/// Trait for DNS resolution.
///
/// Implemented by the OS resolver ([`GaiResolver`](super::GaiResolver)) and by
/// the full fallback chain ([`FallbackResolver`](super::FallbackResolver)).
/// Implementations must be thread-safe.
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to IP addresses.
    ///
    /// The returned addresses will have port 0; callers should set the
    /// appropriate port based on the target service.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}
