//! OS resolver first, raw A/AAAA queries against fixed servers second.
//!
//! The chain is strictly sequential: the OS lookup, then each configured
//! server in order with an A query followed by an AAAA query. The first server
//! that yields at least one address ends the chain.

use super::{
    config::ResolverConfig, transport::exchange, Addrs, GaiResolver, Name, Resolve, Resolving,
};
use crate::base::error::{FailureReason, ResolveError, ServerFailure};
use hickory_resolver::proto::rr::RecordType;
use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::time::Instant;

/// Resolver with a fallback chain of public DNS servers.
///
/// # Example
///
/// ```rust,ignore
/// use fallback_resolver::dns::{FallbackResolver, ResolverConfig};
///
/// let resolver = FallbackResolver::new(ResolverConfig::default())?;
/// let ips = resolver.lookup("example.com").await?;
/// ```
#[derive(Clone)]
pub struct FallbackResolver {
    config: ResolverConfig,
    system: Arc<dyn Resolve>,
}

impl FallbackResolver {
    /// Creates a resolver backed by the OS resolver ([`GaiResolver`]).
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        config.validate()?;
        Ok(Self {
            config,
            system: Arc::new(GaiResolver::new()),
        })
    }

    /// Replaces the first-stage resolver.
    pub fn with_system_resolver(mut self, system: Arc<dyn Resolve>) -> Self {
        self.system = system;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `domain` to a non-empty list of addresses.
    ///
    /// A records come before AAAA records when the answer comes from a
    /// fallback server.
    pub async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        self.lookup_name(Name::new(domain)).await
    }

    async fn lookup_name(&self, name: Name) -> Result<Vec<IpAddr>, ResolveError> {
        if name.is_empty() {
            return Err(ResolveError::InvalidName {
                domain: name.to_string(),
            });
        }
        if let Some(ip) = name.ip_literal() {
            return Ok(vec![ip]);
        }

        if let Some(addrs) = self.lookup_system(&name).await {
            return Ok(addrs);
        }

        self.lookup_servers(&name).await
    }

    async fn lookup_system(&self, name: &Name) -> Option<Vec<IpAddr>> {
        let timeout = self.config.system_timeout;
        match tokio::time::timeout(timeout, self.system.resolve(name.clone())).await {
            Ok(Ok(addrs)) => {
                let ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
                if ips.is_empty() {
                    tracing::debug!(domain = %name, "system resolver returned no addresses");
                    return None;
                }
                tracing::debug!(domain = %name, count = ips.len(), "resolved via system resolver");
                Some(ips)
            }
            Ok(Err(e)) => {
                tracing::debug!(domain = %name, error = %e, "system resolver failed, falling back");
                None
            }
            Err(_) => {
                tracing::debug!(domain = %name, ?timeout, "system resolver timed out, falling back");
                None
            }
        }
    }

    async fn lookup_servers(&self, name: &Name) -> Result<Vec<IpAddr>, ResolveError> {
        let fqdn = name.fqdn();
        let deadline = self.config.deadline.map(|d| Instant::now() + d);
        let mut failures = Vec::new();

        for &server in &self.config.servers {
            let Some(timeout) = self.budget(deadline) else { break };

            let mut addrs = match query(server, &fqdn, RecordType::A, timeout).await {
                Ok(addrs) => addrs,
                Err(failure) => {
                    failures.push(failure);
                    continue;
                }
            };
            if addrs.is_empty() {
                failures.push(no_addresses(server, RecordType::A));
            }

            if let Some(timeout) = self.budget(deadline) {
                match query(server, &fqdn, RecordType::AAAA, timeout).await {
                    Ok(v6) if v6.is_empty() => {
                        failures.push(no_addresses(server, RecordType::AAAA))
                    }
                    Ok(v6) => addrs.extend(v6),
                    Err(failure) => failures.push(failure),
                }
            }

            if !addrs.is_empty() {
                tracing::debug!(domain = %name, server = %server, count = addrs.len(), "resolved via fallback server");
                return Ok(addrs);
            }
        }

        // Covers the last server too: its exchanges are clamped to the
        // deadline, so running out of time there ends the loop normally.
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            tracing::warn!(domain = %name, failed = failures.len(), "fallback deadline exceeded");
            return Err(ResolveError::DeadlineExceeded {
                domain: name.to_string(),
                failures,
            });
        }

        tracing::warn!(domain = %name, failed = failures.len(), "all fallback servers failed");
        Err(ResolveError::NotResolved {
            domain: name.to_string(),
            failures,
        })
    }

    /// Per-exchange timeout, clamped to what is left of the deadline.
    fn budget(&self, deadline: Option<Instant>) -> Option<Duration> {
        let timeout = self.config.exchange_timeout;
        match deadline {
            None => Some(timeout),
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                (!remaining.is_zero()).then(|| timeout.min(remaining))
            }
        }
    }
}

/// One exchange; transport failures and non-success codes become a
/// [`ServerFailure`].
async fn query(
    server: SocketAddr,
    fqdn: &str,
    record_type: RecordType,
    timeout: Duration,
) -> Result<Vec<IpAddr>, ServerFailure> {
    let failure = |reason: FailureReason| ServerFailure {
        server,
        record_type,
        reason,
    };

    match exchange(server, fqdn, record_type, timeout).await {
        Ok(response) if response.is_success() => Ok(response.addresses),
        Ok(response) => {
            tracing::debug!(server = %server, domain = %fqdn, %record_type, rcode = %response.rcode, "non-success response");
            Err(failure(FailureReason::ResponseCode(response.rcode)))
        }
        Err(e) => {
            tracing::debug!(server = %server, domain = %fqdn, %record_type, error = %e, "exchange failed");
            Err(failure(e.into()))
        }
    }
}

fn no_addresses(server: SocketAddr, record_type: RecordType) -> ServerFailure {
    ServerFailure {
        server,
        record_type,
        reason: FailureReason::NoAddresses,
    }
}

impl Resolve for FallbackResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let ips = resolver.lookup_name(name).await?;
            let addrs: Vec<SocketAddr> = ips.into_iter().map(|ip| SocketAddr::new(ip, 0)).collect();
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

impl fmt::Debug for FallbackResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Resolve `domain` with the default configuration, returning addresses as
/// text.
///
/// Fails only when neither the OS resolver nor any of the default public
/// servers produced an address.
pub async fn resolve_ips(domain: &str) -> Result<Vec<String>, ResolveError> {
    let resolver = FallbackResolver::new(ResolverConfig::default())?;
    let ips = resolver.lookup(domain).await?;
    Ok(ips.iter().map(ToString::to_string).collect())
}
