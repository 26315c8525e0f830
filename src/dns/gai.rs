//! First stage of every lookup: the platform resolver.
//!
//! Goes through `getaddrinfo`, so /etc/hosts, resolv.conf and nsswitch all
//! apply.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::error::ResolveError;
use std::{
    io,
    net::{SocketAddr, ToSocketAddrs},
};

/// OS resolver: `getaddrinfo` on the blocking pool.
///
/// Dropping the returned future does not stop the underlying lookup; the
/// blocking thread runs to completion and its result is discarded.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.clone();
            let addrs = tokio::task::spawn_blocking(move || getaddrinfo(host.as_str()))
                .await
                .map_err(|e| {
                    tracing::error!(domain = %name, error = %e, "getaddrinfo task failed");
                    ResolveError::system(name.as_str(), io::Error::other(e))
                })?
                .map_err(|e| {
                    tracing::debug!(domain = %name, error = %e, "getaddrinfo failed");
                    ResolveError::system(name.as_str(), e)
                })?;

            tracing::debug!(domain = %name, count = addrs.len(), "getaddrinfo answered");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

/// Distinct addresses for `host` in resolver order, all with port 0.
///
/// An empty answer is reported as `NotFound` so callers only ever see a
/// non-empty list on success.
fn getaddrinfo(host: &str) -> io::Result<Vec<SocketAddr>> {
    let mut addrs: Vec<SocketAddr> = Vec::new();
    for addr in (host, 0u16).to_socket_addrs()? {
        // hosts files commonly list the same address twice
        if !addrs.contains(&addr) {
            addrs.push(addr);
        }
    }

    if addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "getaddrinfo returned no addresses",
        ));
    }
    Ok(addrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gai_resolver_localhost() {
        let resolver = GaiResolver::new();
        let result = resolver.resolve(Name::new("localhost")).await;

        // localhost should always resolve
        assert!(result.is_ok());
        let addrs: Vec<_> = result.unwrap().collect();
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.port() == 0));
    }

    #[tokio::test]
    async fn test_gai_resolver_ip_literal() {
        let resolver = GaiResolver::new();
        let addrs: Vec<_> = resolver
            .resolve(Name::new("127.0.0.1"))
            .await
            .unwrap()
            .collect();

        assert_eq!(addrs.len(), 1);
        assert!(addrs[0].ip().is_loopback());
    }

    #[test]
    fn test_getaddrinfo_deduplicates() {
        let addrs = getaddrinfo("localhost").unwrap();
        for (i, addr) in addrs.iter().enumerate() {
            assert!(!addrs[i + 1..].contains(addr), "duplicate {addr} in {addrs:?}");
        }
    }

    #[tokio::test]
    async fn test_gai_resolver_invalid_domain() {
        let resolver = GaiResolver::new();
        let err = resolver
            .resolve(Name::new("this-domain-definitely-does-not-exist.invalid"))
            .await
            .err()
            .expect("Should have error");

        match err {
            ResolveError::System { domain, .. } => {
                assert_eq!(domain, "this-domain-definitely-does-not-exist.invalid");
            }
            other => panic!("Unexpected error type: {other:?}"),
        }
    }
}
